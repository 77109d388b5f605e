//! Reshaping chain output into the public answer payload.

use std::path::{Component, Path};

use ankita_memory::Document;
use serde::{Deserialize, Serialize};

use crate::chain::QaOutput;

pub const UNKNOWN_SOURCE: &str = "Unknown";
pub const UNKNOWN_PAGE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<SourceRef>,
}

/// Citation for one retrieved passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    /// File name only; directories are stripped.
    pub source: String,
    pub page: serde_json::Value,
}

/// Last path component, ignoring `.` components and trailing separators.
fn file_name(path: &str) -> String {
    Path::new(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .next_back()
        .and_then(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_owned()),
            Component::Prefix(_) | Component::RootDir | Component::CurDir => None,
        })
        .unwrap_or_default()
}

impl SourceRef {
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self {
            source: file_name(doc.source().unwrap_or(UNKNOWN_SOURCE)),
            page: doc
                .page()
                .cloned()
                .unwrap_or_else(|| serde_json::Value::String(UNKNOWN_PAGE.to_owned())),
        }
    }
}

impl From<QaOutput> for Answer {
    fn from(output: QaOutput) -> Self {
        Self {
            sources: output
                .source_documents
                .iter()
                .map(SourceRef::from_document)
                .collect(),
            answer: output.answer,
        }
    }
}
