//! Declared media type → ingestion variant.
//!
//! Detection trusts the declared type only; bytes are never sniffed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tally_core::{Result, TallyError};

pub const CSV_MEDIA_TYPE: &str = "text/csv";
pub const XLSX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Xlsx,
    Pdf,
    Docx,
}

/// Row-per-record inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularKind {
    Csv,
    Xlsx,
}

/// Whole-file-as-one-record inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
    Tabular(TabularKind),
    Document(DocumentKind),
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 4] = [
        SourceFormat::Csv,
        SourceFormat::Xlsx,
        SourceFormat::Pdf,
        SourceFormat::Docx,
    ];

    pub fn media_type(&self) -> &'static str {
        match self {
            SourceFormat::Csv => CSV_MEDIA_TYPE,
            SourceFormat::Xlsx => XLSX_MEDIA_TYPE,
            SourceFormat::Pdf => PDF_MEDIA_TYPE,
            SourceFormat::Docx => DOCX_MEDIA_TYPE,
        }
    }

    /// Conventional file extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Xlsx => "xlsx",
            SourceFormat::Pdf => "pdf",
            SourceFormat::Docx => "docx",
        }
    }

    pub fn loader(&self) -> Loader {
        match self {
            SourceFormat::Csv => Loader::Tabular(TabularKind::Csv),
            SourceFormat::Xlsx => Loader::Tabular(TabularKind::Xlsx),
            SourceFormat::Pdf => Loader::Document(DocumentKind::Pdf),
            SourceFormat::Docx => Loader::Document(DocumentKind::Docx),
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self.loader(), Loader::Document(_))
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for SourceFormat {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self> {
        detect_format(s)
    }
}

/// Map a declared media type to one of the four supported formats.
///
/// Surrounding whitespace and ASCII case are ignored; anything else must
/// match exactly.
pub fn detect_format(media_type: &str) -> Result<SourceFormat> {
    let declared = media_type.trim();
    SourceFormat::ALL
        .into_iter()
        .find(|f| f.media_type().eq_ignore_ascii_case(declared))
        .ok_or_else(|| TallyError::UnsupportedFormat(declared.to_string()))
}
