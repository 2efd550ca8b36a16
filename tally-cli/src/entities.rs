//! Process-wide named-entity annotator for document uploads.
//!
//! Built once at startup from `[entities]` config and shared by every
//! analysis. Tagging is a capitalization chunker: runs of capitalized words
//! on one line become spans, typed by marker words.

use anyhow::{Result, bail};
use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use tracing::info;

use tally_core::{EntityAnnotator, EntityKind, NamedEntity};

use crate::config::EntitiesSection;

static ANNOTATOR: OnceLock<Arc<CapitalizedSpanAnnotator>> = OnceLock::new();

/// Build the shared annotator. Call once before the first document.
pub fn init_annotator(cfg: &EntitiesSection) -> Result<()> {
    let annotator = CapitalizedSpanAnnotator::new(cfg)?;
    if ANNOTATOR.set(Arc::new(annotator)).is_err() {
        bail!("entity annotator already initialized");
    }
    info!(
        organization_markers = cfg.organization_markers.len(),
        location_markers = cfg.location_markers.len(),
        "entity annotator ready"
    );
    Ok(())
}

/// The shared annotator, if `init_annotator` has run.
pub fn shared_annotator() -> Option<Arc<dyn EntityAnnotator>> {
    ANNOTATOR
        .get()
        .map(|a| Arc::clone(a) as Arc<dyn EntityAnnotator>)
}

pub struct CapitalizedSpanAnnotator {
    word_re: Regex,
    organization_markers: HashSet<String>,
    location_markers: HashSet<String>,
    min_tokens: usize,
}

impl CapitalizedSpanAnnotator {
    pub fn new(cfg: &EntitiesSection) -> Result<Self> {
        let normalize = |words: &[String]| -> HashSet<String> {
            words.iter().map(|w| w.trim().to_uppercase()).collect()
        };
        Ok(Self {
            word_re: Regex::new(r"[A-Za-z][A-Za-z&.'-]*")?,
            organization_markers: normalize(&cfg.organization_markers),
            location_markers: normalize(&cfg.location_markers),
            min_tokens: cfg.min_tokens.max(1),
        })
    }

    fn kind_of(&self, words: &[&str]) -> EntityKind {
        let upper: Vec<String> = words
            .iter()
            .map(|w| w.trim_end_matches('.').to_uppercase())
            .collect();
        if upper.iter().any(|w| self.organization_markers.contains(w)) {
            EntityKind::Organization
        } else if upper.iter().any(|w| self.location_markers.contains(w)) {
            EntityKind::Location
        } else {
            EntityKind::Person
        }
    }

    fn emit(&self, text: &str, span: &[(usize, usize)], out: &mut Vec<NamedEntity>) {
        let (Some(first), Some(last)) = (span.first(), span.last()) else {
            return;
        };
        let words: Vec<&str> = span.iter().map(|&(s, e)| &text[s..e]).collect();
        let kind = self.kind_of(&words);
        if span.len() >= self.min_tokens || kind == EntityKind::Location {
            out.push(NamedEntity::new(&text[first.0..last.1], kind));
        }
    }
}

impl EntityAnnotator for CapitalizedSpanAnnotator {
    /// Marker tables and the word pattern are loaded in `new`.
    fn is_ready(&self) -> bool {
        true
    }

    fn annotate(&self, text: &str) -> tally_core::Result<Vec<NamedEntity>> {
        let mut out = Vec::new();
        let mut span: Vec<(usize, usize)> = Vec::new();

        for m in self.word_re.find_iter(text) {
            let capitalized = m.as_str().starts_with(|c: char| c.is_ascii_uppercase());
            let adjacent = span
                .last()
                .is_some_and(|&(_, end)| text[end..m.start()].chars().all(|c| c == ' ' || c == '\t'));

            if capitalized && (span.is_empty() || adjacent) {
                span.push((m.start(), m.end()));
                continue;
            }

            self.emit(text, &span, &mut out);
            span.clear();
            if capitalized {
                span.push((m.start(), m.end()));
            }
        }
        self.emit(text, &span, &mut out);

        Ok(out)
    }
}
