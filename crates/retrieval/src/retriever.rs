//! Query-time retrieval: question → query vector → top-k chunks → context.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use askdoc_ingest::chunker::Chunk;
use askdoc_ingest::embedding::{Embedder, EmbeddingError};

use crate::index::{IndexError, VectorIndex};

#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Holds the chunk texts, their vector index, and the embedder that produced
/// both — constructed once at startup and read-only afterwards.
///
/// Queries go through the same embedder as the chunks did, so query vectors
/// are guaranteed to share the index's embedding space.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    chunks: Vec<String>,
    /// `None` when the corpus produced zero chunks — queries then get an
    /// empty context instead of an error.
    index: Option<VectorIndex>,
    top_k: usize,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("chunks", &self.chunks)
            .field("index", &self.index)
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}

impl Retriever {
    /// Build from chunks and their embeddings (position i of `vectors`
    /// embeds chunk i). An empty corpus yields a retriever with no index.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        chunks: Vec<Chunk>,
        vectors: Vec<Vec<f32>>,
        top_k: usize,
    ) -> Result<Self, IndexError> {
        if chunks.len() != vectors.len() {
            return Err(IndexError::InvalidArgument(format!(
                "{} chunks but {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        let index = if vectors.is_empty() {
            warn!("Empty corpus — retriever will return empty context for every query");
            None
        } else {
            Some(VectorIndex::build(vectors)?)
        };

        Ok(Self {
            embedder,
            chunks: chunks.into_iter().map(|c| c.content).collect(),
            index,
            top_k,
        })
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Embed `question`, search the index, and join the top-k chunk texts
    /// nearest-first with single spaces.
    ///
    /// An empty index degrades to an empty context. Index-side invalid
    /// arguments are treated the same way ("no context available") — only
    /// embedding transport failures surface as errors.
    pub async fn retrieve(&self, question: &str) -> Result<String, RetrieveError> {
        let Some(index) = &self.index else {
            return Ok(String::new());
        };

        let query = self.embedder.embed(question).await?;

        let hits = match index.search(&query, self.top_k) {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Index search failed, answering without context: {e}");
                return Ok(String::new());
            }
        };

        debug!(
            "Retrieved {} chunks, nearest distance {:.4}",
            hits.len(),
            hits.first().map(|h| h.distance).unwrap_or(f32::NAN)
        );

        // Hit ids come from the same build that populated `chunks`, so the
        // lookup cannot go out of range.
        let context: Vec<&str> = hits
            .iter()
            .filter_map(|hit| self.chunks.get(hit.id).map(String::as_str))
            .collect();

        Ok(context.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Maps known words to fixed unit vectors so distances are predictable.
    struct WordEmbedder;

    #[async_trait]
    impl Embedder for WordEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts
                .iter()
                .map(|t| match *t {
                    "apples" => vec![1.0, 0.0, 0.0],
                    "bananas" => vec![0.0, 1.0, 0.0],
                    "cherries" => vec![0.0, 0.0, 1.0],
                    // Queries about fruit land near apples.
                    _ => vec![0.9, 0.1, 0.0],
                })
                .collect())
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Err(EmbeddingError::Api("backend down".into()))
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    fn fruit_chunks() -> (Vec<Chunk>, Vec<Vec<f32>>) {
        let chunks = vec![
            Chunk { index: 0, content: "apples".into() },
            Chunk { index: 1, content: "bananas".into() },
            Chunk { index: 2, content: "cherries".into() },
        ];
        let vectors = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ];
        (chunks, vectors)
    }

    #[tokio::test]
    async fn retrieves_nearest_chunks_first() {
        let (chunks, vectors) = fruit_chunks();
        let retriever = Retriever::new(Arc::new(WordEmbedder), chunks, vectors, 2).unwrap();

        let context = retriever.retrieve("tell me about fruit").await.unwrap();
        let ordered: Vec<&str> = context.split(' ').collect();
        assert_eq!(ordered[0], "apples", "nearest chunk must come first");
        assert_eq!(ordered.len(), 2);
    }

    #[tokio::test]
    async fn empty_corpus_returns_empty_context() {
        let retriever = Retriever::new(Arc::new(WordEmbedder), vec![], vec![], 3).unwrap();
        let context = retriever.retrieve("anything").await.unwrap();
        assert_eq!(context, "");
    }

    #[tokio::test]
    async fn top_k_beyond_corpus_returns_everything() {
        let (chunks, vectors) = fruit_chunks();
        let retriever = Retriever::new(Arc::new(WordEmbedder), chunks, vectors, 50).unwrap();

        let context = retriever.retrieve("fruit").await.unwrap();
        assert_eq!(context.split(' ').count(), 3);
    }

    #[tokio::test]
    async fn embedding_failure_propagates() {
        let (chunks, vectors) = fruit_chunks();
        let retriever = Retriever::new(Arc::new(FailingEmbedder), chunks, vectors, 3).unwrap();

        let err = retriever.retrieve("fruit").await.unwrap_err();
        assert!(matches!(err, RetrieveError::Embedding(_)));
    }

    #[test]
    fn chunk_vector_count_mismatch_is_rejected() {
        let (chunks, mut vectors) = fruit_chunks();
        vectors.pop();
        let err = Retriever::new(Arc::new(WordEmbedder), chunks, vectors, 3).unwrap_err();
        assert!(matches!(err, IndexError::InvalidArgument(_)));
    }
}
