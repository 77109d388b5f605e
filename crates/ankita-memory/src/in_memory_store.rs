use std::future::Future;
use std::pin::Pin;
use std::sync::{PoisonError, RwLock};

use crate::document::Document;
use crate::vector_store::{ScoredDocument, VectorStore, VectorStoreError};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

struct StoredEntry {
    vector: Vec<f32>,
    document: Document,
}

/// Flat cosine-similarity index held entirely in memory.
///
/// Entries keep insertion order; equal scores are returned in that order.
pub struct InMemoryVectorStore {
    entries: RwLock<Vec<StoredEntry>>,
}

impl InMemoryVectorStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Append a passage. All vectors in one store share the dimension of the first.
    ///
    /// # Errors
    ///
    /// Returns [`VectorStoreError::Dimension`] when `vector` does not match the
    /// dimension of entries already stored.
    pub fn insert(&self, vector: Vec<f32>, document: Document) -> Result<(), VectorStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| VectorStoreError::Poisoned(e.to_string()))?;
        if let Some(first) = entries.first()
            && first.vector.len() != vector.len()
        {
            return Err(VectorStoreError::Dimension {
                expected: first.vector.len(),
                actual: vector.len(),
            });
        }
        entries.push(StoredEntry { vector, document });
        Ok(())
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryVectorStore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl VectorStore for InMemoryVectorStore {
    fn search(
        &self,
        vector: Vec<f32>,
        limit: usize,
    ) -> BoxFuture<'_, Result<Vec<ScoredDocument>, VectorStoreError>> {
        Box::pin(async move {
            let entries = self
                .entries
                .read()
                .map_err(|e| VectorStoreError::Poisoned(e.to_string()))?;
            if let Some(first) = entries.first()
                && first.vector.len() != vector.len()
            {
                return Err(VectorStoreError::Dimension {
                    expected: first.vector.len(),
                    actual: vector.len(),
                });
            }

            let mut scored: Vec<(f32, usize)> = entries
                .iter()
                .enumerate()
                .map(|(idx, e)| (cosine_similarity(&vector, &e.vector), idx))
                .collect();
            // sort_by is stable, so ties stay in insertion order
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
            scored.truncate(limit);

            Ok(scored
                .into_iter()
                .map(|(score, idx)| ScoredDocument {
                    score,
                    document: entries[idx].document.clone(),
                })
                .collect())
        })
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
