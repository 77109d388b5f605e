use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An indexed passage and the metadata recorded when it was ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata.insert(key.to_owned(), value);
        self
    }

    /// Path of the file the passage was extracted from, when recorded as a string.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(serde_json::Value::as_str)
    }

    /// Location indicator within the source file, passed through as recorded.
    #[must_use]
    pub fn page(&self) -> Option<&serde_json::Value> {
        self.metadata.get("page")
    }
}
