pub mod batcher;
pub mod ollama;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use askdoc_core::config::EmbeddingConfig;

pub use batcher::EmbeddingBatcher;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Create the embedding backend selected by config.
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    match config.provider.as_str() {
        "ollama" => Ok(Arc::new(OllamaEmbedder::new(
            config.ollama_url.clone(),
            config.ollama_model.clone(),
            config.dimensions,
        ))),
        "openai" => {
            let api_key = config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| EmbeddingError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            Ok(Arc::new(OpenAiEmbedder::new(
                api_key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
                config.dimensions,
            )))
        }
        other => Err(EmbeddingError::NotConfigured(format!(
            "unknown embedding provider: '{}'",
            other
        ))),
    }
}
