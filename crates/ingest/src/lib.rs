pub mod chunker;
pub mod document;
pub mod embedding;

pub use chunker::{chunk_text, Chunk};
pub use document::load_corpus;
pub use document::IngestError;
pub use embedding::batcher::embed_chunks;
pub use embedding::{create_embedder, Embedder, EmbeddingBatcher, EmbeddingError};
