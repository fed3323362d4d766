pub mod answer;
pub mod provider;
pub mod providers;

pub use answer::{AnswerGenerator, FALLBACK_ANSWER};
pub use provider::{LlmError, LlmProvider};
