//! tally-ingest: format detection, table loaders (CSV/XLSX) and document text extraction (PDF/DOCX).

pub mod format;
pub mod parsers;
pub mod table;
pub mod types;

pub use format::{DocumentKind, Loader, SourceFormat, TabularKind, detect_format};
pub use parsers::{extract_text, load_table};
pub use types::RecordSet;
