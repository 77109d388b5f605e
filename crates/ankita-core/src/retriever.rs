use std::sync::Arc;

use ankita_llm::provider::LlmProvider;
use ankita_memory::{Document, VectorStore};

use crate::error::RetrievalError;

/// Embeds a question and returns the `k` nearest indexed passages.
pub struct Retriever<E> {
    embedder: Arc<E>,
    store: Arc<dyn VectorStore>,
    k: usize,
}

impl<E: LlmProvider> Retriever<E> {
    #[must_use]
    pub fn new(embedder: Arc<E>, store: Arc<dyn VectorStore>, k: usize) -> Self {
        Self { embedder, store, k }
    }

    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    #[must_use]
    pub fn store(&self) -> &dyn VectorStore {
        self.store.as_ref()
    }

    /// Passages ordered by descending similarity, at most `k` of them.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding the question or searching the index fails.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<Document>, RetrievalError> {
        let vector = self
            .embedder
            .embed(question)
            .await
            .map_err(RetrievalError::Embed)?;
        let hits = self.store.search(vector, self.k).await?;
        tracing::debug!(
            hits = hits.len(),
            top_score = hits.first().map(|h| h.score),
            "retrieved passages"
        );
        Ok(hits.into_iter().map(|h| h.document).collect())
    }
}
