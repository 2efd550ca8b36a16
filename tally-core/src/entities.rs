//! Named-entity contract for document-sourced records.
//!
//! Tagging itself lives outside the core; loaders only need the spans it
//! returns and a readiness check to run before the first document.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "PERSON")]
    Person,
    #[serde(rename = "ORGANIZATION")]
    Organization,
    #[serde(rename = "GPE")]
    Location,
}

/// A span of document text tagged with a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub text: String,
    pub kind: EntityKind,
}

impl NamedEntity {
    pub fn new(text: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Tags entities in extracted document text.
///
/// Implementations are built once per process and shared across requests;
/// `annotate` must not mutate shared state so a failed request leaves the
/// annotator usable.
pub trait EntityAnnotator: Send + Sync {
    /// True once every resource the annotator needs has been loaded
    fn is_ready(&self) -> bool;

    fn annotate(&self, text: &str) -> Result<Vec<NamedEntity>>;
}
