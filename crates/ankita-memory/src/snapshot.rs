//! Persisted index format written by the external ingestion process.
//!
//! A snapshot directory holds a single `index.json`:
//!
//! ```json
//! {
//!   "embedding_model": "sentence-transformers/all-MiniLM-L6-v2",
//!   "dimension": 384,
//!   "documents": [
//!     {"id": "p1", "vector": [0.1, 0.2], "content": "...", "metadata": {"source": "/a.pdf", "page": 3}}
//!   ]
//! }
//! ```
//!
//! `embedding_model`, `dimension` and `id` are optional.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::document::Document;
use crate::error::IndexError;
use crate::in_memory_store::InMemoryVectorStore;

pub const SNAPSHOT_FILE: &str = "index.json";

#[derive(Debug, Deserialize)]
struct IndexSnapshot {
    #[serde(default)]
    embedding_model: Option<String>,
    #[serde(default)]
    dimension: Option<usize>,
    documents: Vec<SnapshotEntry>,
}

#[derive(Debug, Deserialize)]
struct SnapshotEntry {
    #[serde(default)]
    #[allow(dead_code)]
    id: Option<String>,
    vector: Vec<f32>,
    content: String,
    #[serde(default)]
    metadata: HashMap<String, serde_json::Value>,
}

/// A snapshot loaded into a searchable store.
#[derive(Debug)]
pub struct LoadedIndex {
    pub store: InMemoryVectorStore,
    /// Embedding model recorded by the ingestion process, if any.
    pub embedding_model: Option<String>,
    pub dimension: usize,
    pub path: PathBuf,
}

/// Read `<dir>/index.json` and build an in-memory index from it.
///
/// This is blocking file IO; call it from `spawn_blocking` inside a runtime.
///
/// # Errors
///
/// Fails when the file is missing, unreadable or malformed, when it holds no
/// documents, or when vectors disagree on their dimension (with each other or
/// with the declared `dimension`).
pub fn load_index(dir: &Path) -> Result<LoadedIndex, IndexError> {
    let path = dir.join(SNAPSHOT_FILE);
    let raw = std::fs::read_to_string(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            IndexError::Missing(path.clone())
        } else {
            IndexError::Io {
                path: path.clone(),
                source,
            }
        }
    })?;
    let snapshot: IndexSnapshot =
        serde_json::from_str(&raw).map_err(|source| IndexError::Parse {
            path: path.clone(),
            source,
        })?;

    let Some(first) = snapshot.documents.first() else {
        return Err(IndexError::Empty(path));
    };
    let dimension = snapshot.dimension.unwrap_or(first.vector.len());
    if dimension == 0 {
        return Err(IndexError::InconsistentDimension {
            index: 0,
            expected: 1,
            actual: 0,
        });
    }

    let store = InMemoryVectorStore::new();
    for (index, entry) in snapshot.documents.into_iter().enumerate() {
        if entry.vector.len() != dimension {
            return Err(IndexError::InconsistentDimension {
                index,
                expected: dimension,
                actual: entry.vector.len(),
            });
        }
        store.insert(
            entry.vector,
            Document {
                content: entry.content,
                metadata: entry.metadata,
            },
        )?;
    }

    tracing::debug!(path = %path.display(), dimension, "index snapshot parsed");

    Ok(LoadedIndex {
        store,
        embedding_model: snapshot.embedding_model,
        dimension,
        path,
    })
}

impl LoadedIndex {
    /// Confirm that vectors produced by the embedding backend are comparable with the index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DimensionMismatch`] when the dimensions differ.
    pub fn check_dimension(&self, embedder: usize) -> Result<(), IndexError> {
        if embedder == self.dimension {
            Ok(())
        } else {
            Err(IndexError::DimensionMismatch {
                embedder,
                index: self.dimension,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::vector_store::VectorStore;

    fn write_snapshot(dir: &Path, value: &serde_json::Value) {
        std::fs::write(dir.join(SNAPSHOT_FILE), value.to_string()).unwrap();
    }

    #[tokio::test]
    async fn loads_documents_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(
            dir.path(),
            &json!({
                "embedding_model": "sentence-transformers/all-MiniLM-L6-v2",
                "dimension": 2,
                "documents": [
                    {"id": "a", "vector": [1.0, 0.0], "content": "neck",
                     "metadata": {"source": "/pdfs/neck.pdf", "page": 1}},
                    {"vector": [0.0, 1.0], "content": "knee"}
                ]
            }),
        );

        let loaded = load_index(dir.path()).unwrap();
        assert_eq!(loaded.dimension, 2);
        assert_eq!(
            loaded.embedding_model.as_deref(),
            Some("sentence-transformers/all-MiniLM-L6-v2")
        );
        assert_eq!(loaded.store.len(), 2);

        let hits = loaded.store.search(vec![1.0, 0.0], 1).await.unwrap();
        assert_eq!(hits[0].document.content, "neck");
        assert_eq!(hits[0].document.source(), Some("/pdfs/neck.pdf"));
    }

    #[test]
    fn dimension_inferred_from_first_vector() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(
            dir.path(),
            &json!({"documents": [{"vector": [0.1, 0.2, 0.3], "content": "x"}]}),
        );
        let loaded = load_index(dir.path()).unwrap();
        assert_eq!(loaded.dimension, 3);
        assert!(loaded.embedding_model.is_none());
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_index(dir.path()).unwrap_err();
        assert!(matches!(err, IndexError::Missing(_)));
        assert!(err.to_string().contains(SNAPSHOT_FILE));
    }

    #[test]
    fn malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SNAPSHOT_FILE), "{not json").unwrap();
        assert!(matches!(
            load_index(dir.path()).unwrap_err(),
            IndexError::Parse { .. }
        ));
    }

    #[test]
    fn empty_documents() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(dir.path(), &json!({"documents": []}));
        assert!(matches!(
            load_index(dir.path()).unwrap_err(),
            IndexError::Empty(_)
        ));
    }

    #[test]
    fn empty_vectors_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(
            dir.path(),
            &json!({"documents": [{"vector": [], "content": "x"}]}),
        );
        assert!(matches!(
            load_index(dir.path()).unwrap_err(),
            IndexError::InconsistentDimension { actual: 0, .. }
        ));
    }

    #[test]
    fn inconsistent_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(
            dir.path(),
            &json!({"documents": [
                {"vector": [1.0, 0.0], "content": "a"},
                {"vector": [1.0], "content": "b"}
            ]}),
        );
        let err = load_index(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            IndexError::InconsistentDimension {
                index: 1,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn declared_dimension_must_match_vectors() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(
            dir.path(),
            &json!({"dimension": 4, "documents": [{"vector": [1.0, 0.0], "content": "a"}]}),
        );
        assert!(matches!(
            load_index(dir.path()).unwrap_err(),
            IndexError::InconsistentDimension { index: 0, .. }
        ));
    }

    #[test]
    fn check_dimension() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(
            dir.path(),
            &json!({"documents": [{"vector": [1.0, 0.0], "content": "a"}]}),
        );
        let loaded = load_index(dir.path()).unwrap();
        assert!(loaded.check_dimension(2).is_ok());
        let err = loaded.check_dimension(384).unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                embedder: 384,
                index: 2
            }
        ));
    }
}
