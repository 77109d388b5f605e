use ankita_llm::LlmError;
use ankita_llm::device::DeviceAttempt;
use ankita_memory::{IndexError, VectorStoreError};

use crate::prompt::TemplateError;

fn render_attempts(attempts: &[DeviceAttempt]) -> String {
    if attempts.is_empty() {
        return "no devices configured".into();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fatal startup failures. The service never binds its socket after one of these.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("embedding backend could not be loaded on any device: {}", render_attempts(.attempts))]
    EmbeddingUnavailable { attempts: Vec<DeviceAttempt> },

    #[error("embedding backend probe failed: {0}")]
    Embedding(#[source] LlmError),

    #[error("vector index unavailable: {0}")]
    Index(#[from] IndexError),

    #[error("generation backend unavailable: {0}")]
    Generation(#[source] LlmError),

    #[error("{backend} backend cannot serve {capability}")]
    Unsupported {
        backend: String,
        capability: &'static str,
    },

    #[error("invalid instruction template: {0}")]
    Template(#[from] TemplateError),

    #[error("startup task failed: {0}")]
    Task(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("failed to embed question: {0}")]
    Embed(#[source] LlmError),

    #[error("index search failed: {0}")]
    Search(#[from] VectorStoreError),
}

/// Per-request failures, reported to the caller and never fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("answer generation failed: {0}")]
    Generation(#[source] LlmError),
}
