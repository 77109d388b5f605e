//! Retrieved passage types and the read-only vector index they are served from.

pub mod document;
pub mod error;
pub mod in_memory_store;
pub mod snapshot;
pub mod vector_store;

pub use document::Document;
pub use error::IndexError;
pub use in_memory_store::InMemoryVectorStore;
pub use snapshot::{LoadedIndex, SNAPSHOT_FILE, load_index};
pub use vector_store::{ScoredDocument, VectorStore, VectorStoreError};
