use askdoc_llm::AnswerGenerator;
use askdoc_retrieval::Retriever;

/// Everything a request handler needs, built once at startup and shared
/// read-only afterwards — no locks, no post-build mutation.
pub struct AppState {
    pub retriever: Retriever,
    pub generator: AnswerGenerator,
}
