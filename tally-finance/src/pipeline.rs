//! End-to-end analysis of one upload: detect → load/extract → classify →
//! summarize.
//!
//! Document extraction (and entity annotation, when an annotator is
//! supplied) runs on a blocking worker; the caller waits for it before
//! classification starts. Tables are parsed on the calling task.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use tally_core::{EntityAnnotator, Result, TallyError, TransactionRecord};
use tally_ingest::{DocumentKind, Loader, RecordSet, SourceFormat, detect_format};

use crate::narration_rules::enrich;
use crate::summary::{AggregateSummary, summarize};

/// Everything handed to the presentation layer for one upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub format: SourceFormat,
    pub records: Vec<TransactionRecord>,
    pub summary: AggregateSummary,
}

/// Analyze raw upload bytes with their declared media type.
///
/// The media type is checked before any byte is parsed. The first failing
/// stage ends the run; no partial result is returned.
pub async fn analyze(
    bytes: Vec<u8>,
    media_type: &str,
    annotator: Option<Arc<dyn EntityAnnotator>>,
) -> Result<Analysis> {
    let format = detect_format(media_type).inspect_err(|e| warn!(%e, "rejected upload"))?;
    debug!(%format, bytes = bytes.len(), "detected format");

    let set = match format.loader() {
        Loader::Tabular(kind) => tally_ingest::load_table(kind, &bytes)?,
        Loader::Document(kind) => extract_document(format, kind, bytes, annotator).await?,
    };

    analyze_set(set)
}

/// Classify and summarize an already-loaded record set.
pub fn analyze_set(set: RecordSet) -> Result<Analysis> {
    let RecordSet {
        format,
        has_amount,
        records,
    } = set;

    let records: Vec<TransactionRecord> = records.into_iter().map(enrich).collect();
    let summary = summarize(&records, has_amount)?;

    info!(
        %format,
        records = records.len(),
        cash_withdrawals = summary.cash_withdrawal_count,
        "analysis complete"
    );

    Ok(Analysis {
        format,
        records,
        summary,
    })
}

async fn extract_document(
    format: SourceFormat,
    kind: DocumentKind,
    bytes: Vec<u8>,
    annotator: Option<Arc<dyn EntityAnnotator>>,
) -> Result<RecordSet> {
    if let Some(a) = &annotator {
        if !a.is_ready() {
            return Err(TallyError::Annotation(
                "entity annotator is not initialized".to_string(),
            ));
        }
    }

    let worker = tokio::task::spawn_blocking(move || -> Result<RecordSet> {
        let text = tally_ingest::extract_text(kind, &bytes)?;
        let entities = match &annotator {
            Some(a) => Some(a.annotate(&text)?),
            None => None,
        };
        Ok(RecordSet::from_document(format, text, entities))
    });

    worker
        .await
        .map_err(|e| TallyError::extraction(format!("extraction worker failed: {e}")))?
}
