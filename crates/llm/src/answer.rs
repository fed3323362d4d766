//! Answer synthesis with a fixed prompt and an explicit fallback policy.

use tracing::{debug, error};

use crate::provider::{LlmError, LlmProvider};

/// Returned verbatim whenever the generation backend fails — the request
/// still completes with a well-formed answer instead of an error.
pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't generate an answer.";

/// Wraps a provider with the fixed context/question prompt template.
pub struct AnswerGenerator {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl AnswerGenerator {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    /// Build from config, creating the appropriate provider.
    pub fn from_config(config: &askdoc_core::config::LlmConfig) -> Result<Self, LlmError> {
        let provider = crate::providers::create_provider(config)?;
        Ok(Self::new(provider, config.temperature, config.max_tokens))
    }

    /// The prompt sent to the provider: context and question verbatim.
    fn build_prompt(question: &str, context: &str) -> String {
        format!("Context: {context}\nQuestion: {question}\nAnswer:")
    }

    /// Generate an answer grounded in `context`.
    ///
    /// Provider failures never cross this boundary: they are logged and the
    /// caller gets the fixed fallback text.
    pub async fn generate(&self, question: &str, context: &str) -> String {
        let prompt = Self::build_prompt(question, context);

        match self
            .provider
            .complete(&prompt, self.temperature, self.max_tokens)
            .await
        {
            Ok(answer) => {
                debug!("Generated {} chars of answer", answer.len());
                answer
            }
            Err(e) => {
                error!("Answer generation failed: {e}");
                FALLBACK_ANSWER.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(
            &self,
            prompt: &str,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String, LlmError> {
            Ok(prompt.to_string())
        }
    }

    struct DownProvider;

    #[async_trait]
    impl LlmProvider for DownProvider {
        async fn complete(
            &self,
            _prompt: &str,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String, LlmError> {
            Err(LlmError::ApiError {
                status: 429,
                body: "quota exceeded".into(),
            })
        }
    }

    #[test]
    fn prompt_embeds_context_and_question_verbatim() {
        let prompt = AnswerGenerator::build_prompt("What color?", "The sky is blue.");
        assert_eq!(
            prompt,
            "Context: The sky is blue.\nQuestion: What color?\nAnswer:"
        );
    }

    #[tokio::test]
    async fn generate_passes_prompt_to_provider() {
        let generator = AnswerGenerator::new(Box::new(EchoProvider), 0.1, 256);
        let answer = generator.generate("Why?", "Because.").await;
        assert!(answer.contains("Context: Because."));
        assert!(answer.contains("Question: Why?"));
    }

    #[tokio::test]
    async fn provider_failure_yields_fallback() {
        let generator = AnswerGenerator::new(Box::new(DownProvider), 0.1, 256);
        let answer = generator.generate("Why?", "Because.").await;
        assert_eq!(answer, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn empty_context_still_produces_wellformed_prompt() {
        let generator = AnswerGenerator::new(Box::new(EchoProvider), 0.1, 256);
        let answer = generator.generate("Why?", "").await;
        assert!(answer.starts_with("Context: \nQuestion: Why?"));
    }
}
