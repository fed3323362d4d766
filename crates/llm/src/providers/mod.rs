pub mod gemini;
pub mod ollama;
pub mod openai;

use askdoc_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the generation provider selected by config.
///
/// Missing credentials are a hard error here — there is no embedded fallback
/// key, the environment must supply one.
pub fn create_provider(config: &LlmConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    match config.provider.as_str() {
        "gemini" => {
            let api_key = config
                .gemini_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GEMINI_API_KEY not set".into()))?;
            Ok(Box::new(gemini::GeminiProvider::new(
                api_key.clone(),
                config.gemini_model.clone(),
            )))
        }
        "openai" => {
            let api_key = config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = config
                .openai_base_url
                .as_deref()
                .unwrap_or("https://api.openai.com");
            Ok(Box::new(openai::OpenAiProvider::new(
                api_key.clone(),
                config.openai_model.clone(),
                base_url.to_string(),
            )))
        }
        "ollama" => Ok(Box::new(ollama::OllamaProvider::new(
            config.ollama_url.clone(),
            config.ollama_model.clone(),
        ))),
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}
