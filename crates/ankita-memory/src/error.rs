use std::path::PathBuf;

use crate::vector_store::VectorStoreError;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("index snapshot not found at {0}")]
    Missing(PathBuf),

    #[error("failed to read index snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed index snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("index snapshot {0} contains no documents")]
    Empty(PathBuf),

    #[error("document {index} has dimension {actual}, expected {expected}")]
    InconsistentDimension {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("embedding backend produces {embedder}-dimensional vectors but the index holds {index}")]
    DimensionMismatch { embedder: usize, index: usize },

    #[error(transparent)]
    Store(#[from] VectorStoreError),
}
