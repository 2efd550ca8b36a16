//! Transaction record types shared by the loaders, the classifier and the report

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::NamedEntity;

/// A record as produced by a loader, before classification.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRecord {
    /// Free-text description. Missing cells normalize to `""`.
    pub narration: String,
    /// Parsed `Amount` cell, if the schema has one and the cell parsed
    pub amount: Option<Decimal>,
    /// Only set for document-sourced records
    pub named_entities: Option<Vec<NamedEntity>>,
}

impl RawRecord {
    pub fn new(narration: impl Into<String>, amount: Option<Decimal>) -> Self {
        Self {
            narration: narration.into(),
            amount,
            named_entities: None,
        }
    }
}

/// A classified transaction.
///
/// `name`, `payment_method` and `payment_platform` are derived from
/// `narration` alone; two records with the same narration always carry the
/// same derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub narration: String,
    pub amount: Option<Decimal>,
    /// Counterparty name (first all-uppercase multi-word run)
    pub name: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_platform: Option<PaymentPlatform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_entities: Option<Vec<NamedEntity>>,
}

impl TransactionRecord {
    /// Returns true if the platform rules flagged this as an ATM withdrawal
    pub fn is_cash_withdrawal(&self) -> bool {
        self.payment_platform == Some(PaymentPlatform::Atm)
    }
}

/// Payment rail found in the narration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaymentMethod {
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "IMPS")]
    Imps,
    #[serde(rename = "NEFT")]
    Neft,
    #[serde(rename = "RTGS")]
    Rtgs,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Upi,
        PaymentMethod::Imps,
        PaymentMethod::Neft,
        PaymentMethod::Rtgs,
    ];

    /// The token as it appears in bank narrations
    pub fn token(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Imps => "IMPS",
            PaymentMethod::Neft => "NEFT",
            PaymentMethod::Rtgs => "RTGS",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.token() == token)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Consumer payment app or channel inferred from narration keywords
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaymentPlatform {
    #[serde(rename = "PhonePe")]
    PhonePe,
    #[serde(rename = "Paytm")]
    Paytm,
    #[serde(rename = "BharatPay")]
    BharatPay,
    #[serde(rename = "ATM")]
    Atm,
    #[serde(rename = "GooglePay")]
    GooglePay,
}

impl PaymentPlatform {
    /// Human-readable label for tables and charts
    pub fn label(&self) -> &'static str {
        match self {
            PaymentPlatform::PhonePe => "PhonePe",
            PaymentPlatform::Paytm => "Paytm",
            PaymentPlatform::BharatPay => "Bharat Pay",
            PaymentPlatform::Atm => "ATM",
            PaymentPlatform::GooglePay => "Google Pay",
        }
    }
}

impl fmt::Display for PaymentPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
