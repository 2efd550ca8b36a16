use serde::{Deserialize, Serialize};

use tally_core::{NamedEntity, RawRecord};

use crate::format::SourceFormat;

/// Normalized output of every loader (format-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub format: SourceFormat,
    /// Whether the source schema had an `Amount` column at all
    pub has_amount: bool,
    pub records: Vec<RawRecord>,
}

impl RecordSet {
    /// A document is always exactly one record holding the full text.
    pub fn from_document(
        format: SourceFormat,
        text: String,
        named_entities: Option<Vec<NamedEntity>>,
    ) -> Self {
        Self {
            format,
            has_amount: false,
            records: vec![RawRecord {
                narration: text,
                amount: None,
                named_entities,
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
