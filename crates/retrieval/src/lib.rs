pub mod index;
pub mod retriever;

pub use index::{IndexError, SearchHit, VectorIndex};
pub use retriever::{RetrieveError, Retriever};
