//! Header handling shared by the CSV and XLSX loaders.

use rust_decimal::Decimal;
use std::str::FromStr;

use tally_core::{Result, TallyError};

pub const NARRATION_COLUMN: &str = "Narration";
pub const AMOUNT_COLUMN: &str = "Amount";

/// Column positions resolved from the first row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub width: usize,
    pub narration: usize,
    pub amount: Option<usize>,
}

impl Header {
    /// Resolve column positions by name. The first column with a matching
    /// (trimmed) name wins.
    pub fn parse<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .collect();

        if names.iter().all(|n| n.is_empty()) {
            return Err(TallyError::malformed("header row is empty"));
        }

        let narration = names
            .iter()
            .position(|n| n == NARRATION_COLUMN)
            .ok_or_else(|| {
                TallyError::malformed(format!(
                    "header has no '{NARRATION_COLUMN}' column (found: {})",
                    names.join(", ")
                ))
            })?;
        let amount = names.iter().position(|n| n == AMOUNT_COLUMN);

        Ok(Self {
            width: names.len(),
            narration,
            amount,
        })
    }

    pub fn has_amount(&self) -> bool {
        self.amount.is_some()
    }
}

/// Parse an amount cell. Blank or non-numeric cells are `None`, never zero.
pub fn parse_amount(cell: &str) -> Option<Decimal> {
    let cleaned = cell.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}
