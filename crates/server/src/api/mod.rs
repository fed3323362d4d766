//! HTTP endpoint modules.
//!
//! Shared response types live here in mod.rs.

mod ask;
mod health;
mod page;

use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

pub use ask::ask;
pub use health::health;
pub use page::index_page;
