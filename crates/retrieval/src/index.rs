//! Exact nearest-neighbor search over chunk embeddings.
//!
//! Brute-force squared Euclidean distance with a full sort — no approximate
//! shortcuts. Every query sees exactly the k closest vectors,
//! deterministically.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("cannot build an index from zero vectors")]
    EmptyBuild,

    #[error("inconsistent dimensionality: vector {id} has {actual} dimensions, expected {expected}")]
    InconsistentDimensions {
        id: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// One search result: the vector's insertion-order identifier and its
/// squared Euclidean distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub id: usize,
    pub distance: f32,
}

/// Read-only collection of embedding vectors, implicitly keyed by insertion
/// order. Built once at startup; no mutation API afterwards.
#[derive(Debug)]
pub struct VectorIndex {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Construct a searchable index over `vectors` in order.
    ///
    /// Fails on an empty sequence or inconsistent dimensionality — both
    /// indicate a broken build pipeline, not a queryable state.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self, IndexError> {
        let dimensions = vectors.first().ok_or(IndexError::EmptyBuild)?.len();

        for (id, vector) in vectors.iter().enumerate() {
            if vector.len() != dimensions {
                return Err(IndexError::InconsistentDimensions {
                    id,
                    expected: dimensions,
                    actual: vector.len(),
                });
            }
        }

        Ok(Self {
            dimensions,
            vectors,
        })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Return the `k` entries closest to `query`, ascending by squared
    /// Euclidean distance, ties broken by lower identifier. `k` larger than
    /// the index is clamped; `k == 0` or a query of the wrong dimensionality
    /// is an invalid argument.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, IndexError> {
        if k == 0 {
            return Err(IndexError::InvalidArgument("k must be positive".into()));
        }
        if query.len() != self.dimensions {
            return Err(IndexError::InvalidArgument(format!(
                "query has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut hits: Vec<SearchHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, vector)| SearchHit {
                id,
                distance: squared_distance(query, vector),
            })
            .collect();

        // total_cmp gives a total order, so equal distances fall back to the
        // id comparison and results stay deterministic.
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
        hits.truncate(k.min(self.vectors.len()));
        Ok(hits)
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
