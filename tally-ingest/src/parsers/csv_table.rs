//! CSV statement loader.
//!
//! Expected shape (column order free, extra columns ignored):
//!   Date,Narration,Amount
//!   01/04/2024,UPI/PAYTM/JOHN SMITH,250.00

use tally_core::{RawRecord, Result, TallyError};

use crate::format::SourceFormat;
use crate::table::{Header, parse_amount};
use crate::types::RecordSet;

/// Decode UTF-8 CSV bytes; the first row is the header.
pub fn load_csv(bytes: &[u8]) -> Result<RecordSet> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| TallyError::malformed(format!("CSV is not valid UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if has_unterminated_quote(text) {
        return Err(TallyError::malformed("CSV ends inside a quoted field"));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(text.as_bytes());
    let mut rows = rdr.records();

    let header_row = rows
        .next()
        .ok_or_else(|| TallyError::malformed("CSV has no header row"))?
        .map_err(|e| TallyError::malformed(format!("CSV header: {e}")))?;
    let header = Header::parse(header_row.iter())?;

    let mut records = Vec::new();
    for result in rows {
        let row = result.map_err(TallyError::malformed)?;
        if row.len() > header.width {
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            return Err(TallyError::malformed(format!(
                "line {line}: expected {} fields, saw {}",
                header.width,
                row.len()
            )));
        }

        let narration = row.get(header.narration).unwrap_or("");
        let amount = header
            .amount
            .and_then(|i| row.get(i))
            .and_then(parse_amount);
        records.push(RawRecord::new(narration, amount));
    }

    Ok(RecordSet {
        format: SourceFormat::Csv,
        has_amount: header.has_amount(),
        records,
    })
}

/// The csv reader accepts EOF inside quotes; treat it as a broken file.
fn has_unterminated_quote(text: &str) -> bool {
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }
        match c {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            ',' | '\n' | '\r' => at_field_start = true,
            _ => at_field_start = false,
        }
    }

    in_quotes
}
