use std::future::Future;

use crate::error::LlmError;

/// A backend that can generate text, embed text, or both.
///
/// Implementations are shared across concurrent requests and must be safe to
/// call from several tasks at once.
pub trait LlmProvider: Send + Sync {
    /// Send `prompt` to the model as a single user turn and return the reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to communicate or does not generate text.
    fn chat(&self, prompt: &str) -> impl Future<Output = Result<String, LlmError>> + Send;

    /// Compute the embedding vector of `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot embed or the backend call fails.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>, LlmError>> + Send;

    fn supports_embeddings(&self) -> bool;

    fn supports_chat(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}
