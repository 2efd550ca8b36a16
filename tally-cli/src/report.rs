//! Terminal rendering of an analysis.

use anyhow::Result;
use std::fmt::Write;

use tally_finance::summary::ranked;
use tally_finance::{Analysis, TotalAmount};

pub fn to_json(analysis: &Analysis) -> Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

/// Records table (first `limit` rows) followed by the summary block.
pub fn render_table(analysis: &Analysis, limit: usize, narration_width: usize) -> Result<String> {
    let mut s = String::new();
    let w = narration_width;

    writeln!(s, "## Extracted information ({})\n", analysis.format)?;
    writeln!(
        s,
        "{:>4}  {:<w$}  {:>12}  {:<24}  {:<6}  {:<10}",
        "#", "Narration", "Amount", "Name", "Method", "Platform"
    )?;
    for (i, r) in analysis.records.iter().take(limit).enumerate() {
        let amount = r.amount.map(|a| a.to_string()).unwrap_or_default();
        let method = r.payment_method.map(|m| m.to_string()).unwrap_or_default();
        let platform = r.payment_platform.map(|p| p.to_string()).unwrap_or_default();
        writeln!(
            s,
            "{:>4}  {:<w$}  {:>12}  {:<24}  {:<6}  {:<10}",
            i + 1,
            clip(&r.narration, w),
            amount,
            clip(r.name.as_deref().unwrap_or(""), 24),
            method,
            platform,
        )?;
    }
    if analysis.records.len() > limit {
        writeln!(s, "      ... {} more", analysis.records.len() - limit)?;
    }

    let summary = &analysis.summary;
    let total = match summary.total_amount {
        TotalAmount::Available(v) => v.to_string(),
        TotalAmount::Unavailable => "N/A (Amount column not found)".to_string(),
    };
    writeln!(s, "\nTotal amount: {total}")?;

    writeln!(s, "\n## Payment method distribution")?;
    for (m, n) in ranked(&summary.method_distribution) {
        writeln!(s, "- {m}: {n}")?;
    }
    writeln!(s, "\n## Payment platform distribution")?;
    for (p, n) in ranked(&summary.platform_distribution) {
        writeln!(s, "- {p}: {n}")?;
    }
    writeln!(
        s,
        "\n## Cash withdrawal vs other\n- Cash withdrawal: {}\n- Other transactions: {}",
        summary.cash_withdrawal_count, summary.other_count
    )?;

    Ok(s)
}

/// One-line, width-limited view of free text.
fn clip(text: &str, width: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    if flat.chars().count() <= width {
        return flat;
    }
    let mut out: String = flat.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
