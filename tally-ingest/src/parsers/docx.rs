//! DOCX paragraph text extraction.
//!
//! Reads `word/document.xml` and emits every body paragraph followed by a
//! newline. Paragraphs nested in tables or text boxes are not body
//! paragraphs and are skipped. Elements are matched by namespace and local
//! name, whatever prefix the producer bound.

use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use std::io::{Cursor, Read};

use tally_core::{Result, TallyError};

const DOCUMENT_PART: &str = "word/document.xml";
const WORDML_NS: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub fn extract_docx_text(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| TallyError::extraction(format!("cannot open DOCX: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| TallyError::extraction(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| TallyError::extraction(format!("{DOCUMENT_PART}: {e}")))?;

    paragraphs_text(&xml)
}

/// Walk the document body and collect paragraph text.
fn paragraphs_text(xml: &str) -> Result<String> {
    let mut reader = NsReader::from_str(xml);

    let mut out = String::new();
    let mut paragraph: Option<String> = None;
    // Depth inside tbl / txbxContent; paragraphs there are skipped.
    let mut nested = 0usize;
    let mut in_text = false;

    loop {
        let pos = reader.buffer_position();
        let (ns, event) = reader.read_resolved_event().map_err(|e| {
            TallyError::extraction(format!("{DOCUMENT_PART} near byte {pos}: {e}"))
        })?;
        let wordml = matches!(ns, ResolveResult::Bound(Namespace(n)) if n == WORDML_NS);

        match event {
            Event::Start(e) if wordml => match e.local_name().as_ref() {
                b"tbl" | b"txbxContent" => nested += 1,
                b"p" if nested == 0 => paragraph = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Event::End(e) if wordml => match e.local_name().as_ref() {
                b"tbl" | b"txbxContent" => nested = nested.saturating_sub(1),
                b"p" if nested == 0 => {
                    if let Some(text) = paragraph.take() {
                        out.push_str(&text);
                        out.push('\n');
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Event::Empty(e) if wordml => {
                let Some(text) = paragraph.as_mut() else {
                    if e.local_name().as_ref() == b"p" && nested == 0 {
                        out.push('\n');
                    }
                    continue;
                };
                if nested > 0 {
                    continue;
                }
                match e.local_name().as_ref() {
                    b"tab" => text.push('\t'),
                    b"br" | b"cr" => text.push('\n'),
                    _ => {}
                }
            }
            Event::Text(t) if in_text && nested == 0 => {
                if let Some(text) = paragraph.as_mut() {
                    let unescaped = t.unescape().map_err(TallyError::extraction)?;
                    text.push_str(&unescaped);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}
