//! The embedded chat page.

use axum::response::Html;

/// `GET /` — serve the single-page chat UI. Embedded at compile time so the
/// binary has no runtime asset directory to locate.
pub async fn index_page() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
