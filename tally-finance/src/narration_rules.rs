//! Deterministic narration rules: counterparty name, payment rail and
//! payment platform.
//!
//! Each rule is a pure function of the narration text. A miss is `None`,
//! never an error.

use regex::Regex;
use std::sync::OnceLock;

use tally_core::{PaymentMethod, PaymentPlatform, RawRecord, TransactionRecord};

/// Result of classifying one narration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    pub name: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_platform: Option<PaymentPlatform>,
}

/// Apply all three rules to a narration.
pub fn classify(narration: &str) -> Classification {
    Classification {
        name: extract_name(narration),
        payment_method: extract_payment_method(narration),
        payment_platform: extract_payment_platform(narration),
    }
}

/// Consume a loaded record and return its classified form.
pub fn enrich(raw: RawRecord) -> TransactionRecord {
    let Classification {
        name,
        payment_method,
        payment_platform,
    } = classify(&raw.narration);

    TransactionRecord {
        narration: raw.narration,
        amount: raw.amount,
        name,
        payment_method,
        payment_platform,
        named_entities: raw.named_entities,
    }
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:[A-Z]+\s)+[A-Z]+\b").expect("name pattern"))
}

fn method_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:UPI|IMPS|NEFT|RTGS)\b").expect("method pattern"))
}

/// First run of two or more all-uppercase words, e.g. `"JOHN SMITH"`.
pub fn extract_name(narration: &str) -> Option<String> {
    name_re().find(narration).map(|m| m.as_str().to_string())
}

/// First whole-word rail token, scanning left to right.
pub fn extract_payment_method(narration: &str) -> Option<PaymentMethod> {
    method_re()
        .find(narration)
        .and_then(|m| PaymentMethod::from_token(m.as_str()))
}

/// Keyword table, checked top to bottom. The first rule with any matching
/// keyword wins regardless of where the keyword sits in the text.
const PLATFORM_RULES: &[(&[&str], PaymentPlatform)] = &[
    (&["phone pe", "@ybl", "@axl"], PaymentPlatform::PhonePe),
    (&["paytm"], PaymentPlatform::Paytm),
    (&["bharatpe"], PaymentPlatform::BharatPay),
    (&["cash wdl"], PaymentPlatform::Atm),
    (&["@ok"], PaymentPlatform::GooglePay),
];

pub fn extract_payment_platform(narration: &str) -> Option<PaymentPlatform> {
    let lowered = narration.to_lowercase();
    PLATFORM_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(*k)))
        .map(|(_, platform)| *platform)
}
