use rust_decimal::Decimal;
use std::io::{Cursor, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tally_core::{
    EntityAnnotator, EntityKind, ErrorKind, NamedEntity, PaymentMethod, PaymentPlatform,
    Result, TallyError,
};
use tally_finance::{TotalAmount, analyze};
use tally_ingest::SourceFormat;
use tally_ingest::format::{CSV_MEDIA_TYPE, DOCX_MEDIA_TYPE, PDF_MEDIA_TYPE, XLSX_MEDIA_TYPE};

fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("word/document.xml", zip::write::FileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

/// One PDF page per entry, each drawing its text with a base-14 font.
fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 11.into()]),
                Operation::new("Td", vec![50.into(), 750.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Tags every all-caps word as a person and counts calls.
struct StubAnnotator {
    ready: AtomicBool,
    fail: bool,
    calls: AtomicUsize,
}

impl StubAnnotator {
    fn new(ready: bool, fail: bool) -> Arc<Self> {
        Arc::new(Self {
            ready: AtomicBool::new(ready),
            fail,
            calls: AtomicUsize::new(0),
        })
    }
}

impl EntityAnnotator for StubAnnotator {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn annotate(&self, text: &str) -> Result<Vec<NamedEntity>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TallyError::Annotation("tagger crashed".to_string()));
        }
        Ok(text
            .split_whitespace()
            .filter(|w| w.len() > 1 && w.chars().all(|c| c.is_ascii_uppercase()))
            .map(|w| NamedEntity::new(w, EntityKind::Person))
            .collect())
    }
}

/// Two-row statement: one UPI transfer, one ATM withdrawal.
#[tokio::test]
async fn test_csv_statement_end_to_end() {
    let csv = "Narration,Amount\nUPI to JOHN SMITH,100\ncash wdl,50\n";
    let analysis = analyze(csv.as_bytes().to_vec(), CSV_MEDIA_TYPE, None)
        .await
        .unwrap();

    assert_eq!(analysis.format, SourceFormat::Csv);
    assert_eq!(analysis.records.len(), 2);

    let first = &analysis.records[0];
    assert_eq!(first.payment_method, Some(PaymentMethod::Upi));
    assert_eq!(first.payment_platform, None);
    assert_eq!(first.name.as_deref(), Some("JOHN SMITH"));

    let second = &analysis.records[1];
    assert_eq!(second.payment_platform, Some(PaymentPlatform::Atm));

    let s = &analysis.summary;
    assert_eq!(s.total_amount, TotalAmount::Available(Decimal::from(150)));
    assert_eq!(s.cash_withdrawal_count, 1);
    assert_eq!(s.other_count, 1);
}

#[tokio::test]
async fn test_csv_without_amount_column() {
    let csv = "Narration\nUPI to JOHN SMITH\ncash wdl\n";
    let analysis = analyze(csv.as_bytes().to_vec(), CSV_MEDIA_TYPE, None)
        .await
        .unwrap();
    assert_eq!(analysis.summary.total_amount, TotalAmount::Unavailable);
    assert!(analysis.records.iter().all(|r| r.amount.is_none()));
}

#[tokio::test]
async fn test_csv_rows_preserved_in_order() {
    let rows: Vec<(String, String)> = (0..25)
        .map(|i| (format!("row {i} NEFT"), format!("{i}.{:02}", i * 3 % 100)))
        .collect();
    let mut csv = String::from("Narration,Amount\n");
    for (n, a) in &rows {
        csv.push_str(&format!("{n},{a}\n"));
    }

    let analysis = analyze(csv.into_bytes(), CSV_MEDIA_TYPE, None).await.unwrap();
    assert_eq!(analysis.records.len(), rows.len());
    for (record, (n, a)) in analysis.records.iter().zip(&rows) {
        assert_eq!(&record.narration, n);
        assert_eq!(record.amount.unwrap().to_string(), *a);
    }
}

#[tokio::test]
async fn test_unsupported_type_rejected_before_parsing() {
    // Bytes are garbage on purpose: detection must fail first.
    let err = analyze(vec![0xff, 0x00, 0x13], "text/plain", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
}

#[tokio::test]
async fn test_malformed_table_is_fatal() {
    let csv = "Narration,Amount\nok,1\nbroken,2,3\n";
    let err = analyze(csv.as_bytes().to_vec(), CSV_MEDIA_TYPE, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedTable);

    let err = analyze(b"not a workbook".to_vec(), XLSX_MEDIA_TYPE, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedTable);
}

#[tokio::test]
async fn test_amount_total_overflow_is_an_error() {
    let csv = "Narration,Amount\na,79228162514264337593543950335\nb,1\n";
    let err = analyze(csv.as_bytes().to_vec(), CSV_MEDIA_TYPE, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedTable);
}

#[tokio::test]
async fn test_docx_is_one_record() {
    let bytes = docx_bytes(&["Statement for RAVI KUMAR", "NEFT credit 5000", "IMPS to x@paytm"]);
    let analysis = analyze(bytes, DOCX_MEDIA_TYPE, None).await.unwrap();

    assert_eq!(analysis.records.len(), 1);
    let record = &analysis.records[0];
    assert_eq!(
        record.narration,
        "Statement for RAVI KUMAR\nNEFT credit 5000\nIMPS to x@paytm\n"
    );
    assert_eq!(record.payment_method, Some(PaymentMethod::Neft));
    assert_eq!(record.payment_platform, Some(PaymentPlatform::Paytm));
    assert_eq!(record.named_entities, None);
    assert_eq!(analysis.summary.total_amount, TotalAmount::Unavailable);
    assert_eq!(analysis.summary.other_count, 1);
}

/// Three pages still make a single record, pages kept in order.
#[tokio::test]
async fn test_multi_page_pdf_is_one_record() {
    let bytes = pdf_bytes(&["Statement for RAVI KUMAR", "RTGS to vendor", "cash wdl"]);
    let analysis = analyze(bytes, PDF_MEDIA_TYPE, None).await.unwrap();

    assert_eq!(analysis.format, SourceFormat::Pdf);
    assert_eq!(analysis.records.len(), 1);
    let record = &analysis.records[0];
    let first = record.narration.find("RAVI KUMAR").unwrap();
    let second = record.narration.find("RTGS").unwrap();
    let third = record.narration.find("cash wdl").unwrap();
    assert!(first < second && second < third);
    assert_eq!(record.payment_method, Some(PaymentMethod::Rtgs));
    assert_eq!(record.payment_platform, Some(PaymentPlatform::Atm));
    assert_eq!(analysis.summary.total_amount, TotalAmount::Unavailable);
    assert_eq!(analysis.summary.cash_withdrawal_count, 1);
    assert_eq!(analysis.summary.other_count, 0);
}

#[tokio::test]
async fn test_document_entities_from_annotator() {
    let annotator = StubAnnotator::new(true, false);
    let bytes = docx_bytes(&["paid RAVI via UPI"]);
    let analysis = analyze(bytes, DOCX_MEDIA_TYPE, Some(annotator.clone()))
        .await
        .unwrap();

    let entities = analysis.records[0].named_entities.as_ref().unwrap();
    let texts: Vec<_> = entities.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["RAVI", "UPI"]);
    assert_eq!(annotator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_tables_skip_annotation() {
    let annotator = StubAnnotator::new(true, false);
    let csv = "Narration\nJOHN SMITH\n";
    let analysis = analyze(csv.as_bytes().to_vec(), CSV_MEDIA_TYPE, Some(annotator.clone()))
        .await
        .unwrap();
    assert_eq!(analysis.records[0].named_entities, None);
    assert_eq!(annotator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_annotator_not_ready() {
    let annotator = StubAnnotator::new(false, false);
    let err = analyze(docx_bytes(&["x"]), DOCX_MEDIA_TYPE, Some(annotator.clone()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Annotation);
    assert_eq!(annotator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_request_leaves_annotator_usable() {
    let failing = StubAnnotator::new(true, true);
    let err = analyze(docx_bytes(&["x"]), DOCX_MEDIA_TYPE, Some(failing.clone()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Annotation);

    let err = analyze(b"garbage".to_vec(), PDF_MEDIA_TYPE, Some(failing.clone()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Extraction);
    assert!(failing.is_ready());

    let csv = "Narration\nNEFT\n";
    let ok = analyze(csv.as_bytes().to_vec(), CSV_MEDIA_TYPE, Some(failing))
        .await
        .unwrap();
    assert_eq!(ok.records.len(), 1);
}

#[tokio::test]
async fn test_analysis_json_shape() {
    let csv = "Narration,Amount\nUPI to JOHN SMITH,100\ncash wdl,50\n";
    let analysis = analyze(csv.as_bytes().to_vec(), CSV_MEDIA_TYPE, None)
        .await
        .unwrap();
    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["format"], "csv");
    assert_eq!(json["records"][0]["payment_method"], "UPI");
    assert_eq!(json["records"][1]["payment_platform"], "ATM");
    assert_eq!(json["summary"]["total_amount"]["value"], "150");
    assert_eq!(json["summary"]["method_distribution"]["UPI"], 1);
    assert_eq!(json["summary"]["platform_distribution"]["ATM"], 1);
}
