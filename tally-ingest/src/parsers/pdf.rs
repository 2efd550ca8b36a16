//! PDF text-layer extraction (no OCR).
//!
//! Pages are read in page-number order and their text concatenated as-is;
//! a page without a text layer contributes nothing. Encrypted files open
//! only when the user password is empty.

use lopdf::Document;

use tally_core::{Result, TallyError};

pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let mut doc = Document::load_mem(bytes)
        .map_err(|e| TallyError::extraction(format!("cannot open PDF: {e}")))?;

    if doc.is_encrypted() {
        doc.decrypt("")
            .map_err(|e| TallyError::extraction(format!("PDF is encrypted: {e}")))?;
    }

    let mut text = String::new();
    for page_number in doc.get_pages().into_keys() {
        let page_text = doc
            .extract_text(&[page_number])
            .map_err(|e| TallyError::extraction(format!("page {page_number}: {e}")))?;
        text.push_str(&page_text);
    }

    Ok(text)
}
