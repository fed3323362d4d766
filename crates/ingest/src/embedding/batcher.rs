use std::sync::Arc;

use tracing::info;

use crate::chunker::Chunk;

use super::traits::{Embedder, EmbeddingError};

/// Collects (chunk index, text) pairs and flushes when the batch is full.
pub struct EmbeddingBatcher {
    buffer: Vec<(usize, String)>,
    batch_size: usize,
    embedder: Arc<dyn Embedder>,
}

impl EmbeddingBatcher {
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(batch_size),
            batch_size,
            embedder,
        }
    }

    /// Add a chunk to the batch. Returns embeddings if the batch is full (auto-flush).
    pub async fn add(
        &mut self,
        index: usize,
        text: String,
    ) -> Result<Option<Vec<(usize, Vec<f32>)>>, EmbeddingError> {
        self.buffer.push((index, text));
        if self.buffer.len() >= self.batch_size {
            Ok(Some(self.flush().await?))
        } else {
            Ok(None)
        }
    }

    /// Force-flush remaining items.
    pub async fn flush(&mut self) -> Result<Vec<(usize, Vec<f32>)>, EmbeddingError> {
        if self.buffer.is_empty() {
            return Ok(Vec::new());
        }
        let batch: Vec<(usize, String)> = self.buffer.drain(..).collect();
        let texts: Vec<&str> = batch.iter().map(|(_, t)| t.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        Ok(batch
            .into_iter()
            .zip(embeddings)
            .map(|((index, _), emb)| (index, emb))
            .collect())
    }

    /// Number of items currently buffered.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Embed every chunk, in order, batching requests to the backend.
///
/// Returns one vector per chunk at the chunk's position — the 1:1
/// chunk-to-vector association the index build relies on.
pub async fn embed_chunks(
    embedder: Arc<dyn Embedder>,
    chunks: &[Chunk],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let mut batcher = EmbeddingBatcher::new(embedder, batch_size);
    let mut vectors: Vec<(usize, Vec<f32>)> = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        if let Some(mut done) = batcher.add(chunk.index, chunk.content.clone()).await? {
            vectors.append(&mut done);
            info!("Embedded {}/{} chunks", vectors.len(), chunks.len());
        }
    }
    vectors.append(&mut batcher.flush().await?);

    // Batches flush in submission order, so this is already chunk order.
    debug_assert!(vectors.iter().enumerate().all(|(i, pair)| i == pair.0));

    Ok(vectors.into_iter().map(|(_, emb)| emb).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeEmbedder {
        call_count: AtomicUsize,
        dims: usize,
    }

    impl FakeEmbedder {
        fn new(dims: usize) -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                dims,
            }
        }
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            // Encode the text length so order is observable.
            Ok(texts
                .iter()
                .map(|t| vec![t.len() as f32; self.dims])
                .collect())
        }

        fn dimensions(&self) -> usize {
            self.dims
        }
    }

    #[tokio::test]
    async fn flush_on_batch_size() {
        let embedder = Arc::new(FakeEmbedder::new(4));
        let mut batcher = EmbeddingBatcher::new(embedder.clone(), 3);

        assert!(batcher.add(0, "a".into()).await.unwrap().is_none());
        assert!(batcher.add(1, "b".into()).await.unwrap().is_none());
        assert_eq!(batcher.pending(), 2);

        let result = batcher.add(2, "c".into()).await.unwrap();
        let embeddings = result.expect("third add should flush");
        assert_eq!(embeddings.len(), 3);
        assert_eq!(batcher.pending(), 0);
        assert_eq!(embedder.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn manual_flush() {
        let embedder = Arc::new(FakeEmbedder::new(4));
        let mut batcher = EmbeddingBatcher::new(embedder.clone(), 100);

        batcher.add(0, "a".into()).await.unwrap();
        batcher.add(1, "b".into()).await.unwrap();

        let result = batcher.flush().await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(batcher.pending(), 0);
    }

    #[tokio::test]
    async fn flush_empty_is_noop() {
        let embedder = Arc::new(FakeEmbedder::new(4));
        let mut batcher = EmbeddingBatcher::new(embedder.clone(), 10);

        let result = batcher.flush().await.unwrap();
        assert!(result.is_empty());
        assert_eq!(embedder.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn embed_chunks_preserves_order_across_batches() {
        let embedder = Arc::new(FakeEmbedder::new(2));
        let chunks: Vec<Chunk> = (0..7)
            .map(|i| Chunk {
                index: i,
                // Distinct lengths: "x", "xx", ...
                content: "x".repeat(i + 1),
            })
            .collect();

        let vectors = embed_chunks(embedder.clone(), &chunks, 3).await.unwrap();
        assert_eq!(vectors.len(), 7);
        for (i, v) in vectors.iter().enumerate() {
            assert_eq!(v[0], (i + 1) as f32, "vector {i} out of order");
        }
        // 7 chunks at batch size 3 → 3 backend calls.
        assert_eq!(embedder.call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn embed_chunks_empty_input() {
        let embedder = Arc::new(FakeEmbedder::new(2));
        let vectors = embed_chunks(embedder.clone(), &[], 3).await.unwrap();
        assert!(vectors.is_empty());
        assert_eq!(embedder.call_count.load(Ordering::SeqCst), 0);
    }
}
