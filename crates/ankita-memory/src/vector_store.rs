use std::future::Future;
use std::pin::Pin;

use crate::document::Document;

#[derive(Debug, thiserror::Error)]
pub enum VectorStoreError {
    #[error("search error: {0}")]
    Search(String),
    #[error("vector has dimension {actual}, index expects {expected}")]
    Dimension { expected: usize, actual: usize },
    #[error("index lock poisoned: {0}")]
    Poisoned(String),
}

#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub score: f32,
    pub document: Document,
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Nearest-neighbour search over indexed passages.
///
/// The request path only reads; implementations must allow concurrent searches.
pub trait VectorStore: Send + Sync {
    /// Return at most `limit` documents ordered by descending similarity to `vector`.
    fn search(
        &self,
        vector: Vec<f32>,
        limit: usize,
    ) -> BoxFuture<'_, Result<Vec<ScoredDocument>, VectorStoreError>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
