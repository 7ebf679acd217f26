//! 响应规范化：按别名优先级将上游 JSON 映射为规范分析记录。
//!
//! Response normalization.
//!
//! The analysis service's field names drift between versions and providers.
//! Each canonical field accepts an ordered list of upstream keys; the first key
//! holding a non-empty string wins.
//!
//! | Canonical field      | Accepted keys (priority order)                                           |
//! |----------------------|--------------------------------------------------------------------------|
//! | `summary`            | `summary`, `Summary`                                                     |
//! | `marketPotential`    | `market_potential`, `marketPotential`, `market_analysis`, `marketAnalysis` |
//! | `keyRisks`           | `key_risks`, `keyRisks`, `risks`, `Risks`                                |
//! | `suggestions`        | `suggestions`, `Suggestions`, `recommendations`, `improvements`          |
//! | `finalVerdict`       | `final_verdict`, `finalVerdict`, `verdict`, `Verdict`                    |
//! | `validationStrategy` | `validation_strategy`, `validationStrategy`, `validation`, `strategy`    |
//!
//! ## Example
//!
//! ```rust
//! use idea_analyzer::normalize::normalize;
//! use idea_analyzer::types::CanonicalField;
//!
//! let raw = serde_json::json!({ "summary": "  x  " });
//! let err = normalize(raw.as_object().unwrap()).unwrap_err();
//! assert_eq!(err.missing.len(), 5);
//! assert!(!err.missing.contains(&CanonicalField::Summary));
//! ```

use crate::types::{CanonicalAnalysis, CanonicalField, RawResponse};
use serde_json::Value;

/// Ordered upstream keys accepted for each canonical field, in canonical field order.
pub const ALIAS_TABLE: [(CanonicalField, &[&str]); 6] = [
    (CanonicalField::Summary, &["summary", "Summary"]),
    (
        CanonicalField::MarketPotential,
        &["market_potential", "marketPotential", "market_analysis", "marketAnalysis"],
    ),
    (
        CanonicalField::KeyRisks,
        &["key_risks", "keyRisks", "risks", "Risks"],
    ),
    (
        CanonicalField::Suggestions,
        &["suggestions", "Suggestions", "recommendations", "improvements"],
    ),
    (
        CanonicalField::FinalVerdict,
        &["final_verdict", "finalVerdict", "verdict", "Verdict"],
    ),
    (
        CanonicalField::ValidationStrategy,
        &["validation_strategy", "validationStrategy", "validation", "strategy"],
    ),
];

/// Normalization failure listing every canonical field with no usable alias.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing fields: {}", field_names(.missing))]
pub struct IncompleteResponse {
    pub missing: Vec<CanonicalField>,
}

pub(crate) fn field_names(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Accepted keys for `field`, highest priority first.
pub fn aliases(field: CanonicalField) -> &'static [&'static str] {
    ALIAS_TABLE
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, keys)| *keys)
        .unwrap_or(&[])
}

/// Resolve a single field: first alias whose value is a string non-empty after trimming.
pub fn resolve_field<'a>(raw: &'a RawResponse, field: CanonicalField) -> Option<&'a str> {
    aliases(field).iter().find_map(|key| match raw.get(*key) {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        }
        _ => None,
    })
}

/// Map `raw` onto the canonical schema. All-or-nothing.
pub fn normalize(raw: &RawResponse) -> Result<CanonicalAnalysis, IncompleteResponse> {
    let mut values: [String; 6] = Default::default();
    let mut missing = Vec::new();

    for (slot, (field, _)) in values.iter_mut().zip(ALIAS_TABLE.iter()) {
        match resolve_field(raw, *field) {
            Some(v) => *slot = v.to_string(),
            None => missing.push(*field),
        }
    }

    if missing.is_empty() {
        Ok(CanonicalAnalysis::from_resolved(values))
    } else {
        Err(IncompleteResponse { missing })
    }
}
