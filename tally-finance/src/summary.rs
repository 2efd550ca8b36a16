//! Summary aggregation over classified records: total amount, method and
//! platform distributions, cash-withdrawal split.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tally_core::{PaymentMethod, PaymentPlatform, Result, TallyError, TransactionRecord};

/// Sum of amounts, or a marker when the source had no `Amount` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum TotalAmount {
    Available(Decimal),
    Unavailable,
}

impl TotalAmount {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            TotalAmount::Available(v) => Some(*v),
            TotalAmount::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub total_amount: TotalAmount,
    /// Unclassified records are not counted
    pub method_distribution: BTreeMap<PaymentMethod, usize>,
    pub platform_distribution: BTreeMap<PaymentPlatform, usize>,
    pub cash_withdrawal_count: usize,
    pub other_count: usize,
}

impl AggregateSummary {
    pub fn record_count(&self) -> usize {
        self.cash_withdrawal_count + self.other_count
    }
}

/// Aggregate classified records.
///
/// `has_amount` is whether the source schema carried an amount column;
/// absent amounts inside such a schema are skipped, not counted as zero.
/// A total outside the decimal range is a malformed table.
pub fn summarize(records: &[TransactionRecord], has_amount: bool) -> Result<AggregateSummary> {
    let total_amount = if has_amount {
        TotalAmount::Available(checked_total(records)?)
    } else {
        TotalAmount::Unavailable
    };

    let mut method_distribution = BTreeMap::new();
    let mut platform_distribution = BTreeMap::new();
    for r in records {
        if let Some(m) = r.payment_method {
            *method_distribution.entry(m).or_insert(0) += 1;
        }
        if let Some(p) = r.payment_platform {
            *platform_distribution.entry(p).or_insert(0) += 1;
        }
    }

    let cash_withdrawal_count = records.iter().filter(|r| r.is_cash_withdrawal()).count();

    Ok(AggregateSummary {
        total_amount,
        method_distribution,
        platform_distribution,
        cash_withdrawal_count,
        other_count: records.len() - cash_withdrawal_count,
    })
}

fn checked_total(records: &[TransactionRecord]) -> Result<Decimal> {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.amount.map(|a| (i, a)))
        .try_fold(Decimal::ZERO, |acc, (i, amount)| {
            acc.checked_add(amount).ok_or_else(|| {
                TallyError::malformed(format!("amount total overflows at record {}", i + 1))
            })
        })
}

/// Distribution entries by descending count; ties keep enumeration order.
pub fn ranked<K: Copy + Ord>(distribution: &BTreeMap<K, usize>) -> Vec<(K, usize)> {
    let mut entries: Vec<_> = distribution.iter().map(|(k, n)| (*k, *n)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}
