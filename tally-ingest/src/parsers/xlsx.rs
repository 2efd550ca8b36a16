//! XLSX statement loader. Reads the workbook's active sheet; row 1 is the
//! header.

use calamine::{Data, Reader, Xlsx};
use quick_xml::Reader as XmlReader;
use quick_xml::events::Event;
use rust_decimal::Decimal;
use std::io::{Cursor, Read};

use tally_core::{RawRecord, Result, TallyError};

use crate::format::SourceFormat;
use crate::table::{Header, parse_amount};
use crate::types::RecordSet;

pub fn load_xlsx(bytes: &[u8]) -> Result<RecordSet> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| TallyError::malformed(format!("cannot open workbook: {e}")))?;

    let names = workbook.sheet_names();
    let tab = active_tab(bytes)?;
    let sheet = names
        .get(tab)
        .or_else(|| names.first())
        .cloned()
        .ok_or_else(|| TallyError::malformed("workbook has no worksheets"))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| TallyError::malformed(format!("cannot read worksheet {sheet:?}: {e}")))?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| TallyError::malformed("worksheet is empty"))?;
    let header = Header::parse(header_row.iter().map(cell_text))?;

    let records = rows
        .map(|row| {
            let narration = row.get(header.narration).map(cell_text).unwrap_or_default();
            let amount = header
                .amount
                .and_then(|i| row.get(i))
                .and_then(cell_amount);
            RawRecord::new(narration, amount)
        })
        .collect();

    Ok(RecordSet {
        format: SourceFormat::Xlsx,
        has_amount: header.has_amount(),
        records,
    })
}

/// Index of the active tab from `<bookViews><workbookView activeTab=".."/>`
/// in `xl/workbook.xml`; 0 when the workbook does not record one.
fn active_tab(bytes: &[u8]) -> Result<usize> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| TallyError::malformed(format!("cannot open workbook: {e}")))?;
    let mut xml = String::new();
    match archive.by_name("xl/workbook.xml") {
        Ok(mut entry) => {
            entry
                .read_to_string(&mut xml)
                .map_err(|e| TallyError::malformed(format!("cannot read workbook.xml: {e}")))?;
        }
        Err(_) => return Ok(0),
    }

    let mut reader = XmlReader::from_str(&xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"workbookView" =>
            {
                for attr in e.attributes().flatten() {
                    if attr.key.local_name().as_ref() == b"activeTab" {
                        let value = attr.decode_and_unescape_value(&reader).map_err(|e| {
                            TallyError::malformed(format!("bad activeTab value: {e}"))
                        })?;
                        return Ok(value.trim().parse().unwrap_or(0));
                    }
                }
                return Ok(0);
            }
            Ok(Event::Eof) => return Ok(0),
            Err(e) => {
                return Err(TallyError::malformed(format!("cannot parse workbook.xml: {e}")));
            }
            _ => {}
        }
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell_amount(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::Float(f) => Decimal::try_from(*f).ok().map(|d| d.normalize()),
        Data::String(s) => parse_amount(s),
        _ => None,
    }
}
