pub mod csv_table;
pub mod docx;
pub mod pdf;
pub mod xlsx;

use tracing::debug;

use tally_core::Result;

use crate::format::{DocumentKind, TabularKind};
use crate::types::RecordSet;

/// Parse tabular bytes into one raw record per data row.
pub fn load_table(kind: TabularKind, bytes: &[u8]) -> Result<RecordSet> {
    let set = match kind {
        TabularKind::Csv => csv_table::load_csv(bytes)?,
        TabularKind::Xlsx => xlsx::load_xlsx(bytes)?,
    };
    debug!(?kind, rows = set.len(), has_amount = set.has_amount, "loaded table");
    Ok(set)
}

/// Extract the full text layer of a document as one string.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String> {
    let text = match kind {
        DocumentKind::Pdf => pdf::extract_pdf_text(bytes)?,
        DocumentKind::Docx => docx::extract_docx_text(bytes)?,
    };
    debug!(?kind, chars = text.chars().count(), "extracted document text");
    Ok(text)
}
