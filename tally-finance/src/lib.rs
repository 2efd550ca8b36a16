//! tally-finance: narration rules, summary aggregation and the analysis pipeline

pub mod narration_rules;
pub mod pipeline;
pub mod summary;

pub use narration_rules::{Classification, classify, enrich};
pub use pipeline::{Analysis, analyze, analyze_set};
pub use summary::{AggregateSummary, TotalAmount, summarize};
