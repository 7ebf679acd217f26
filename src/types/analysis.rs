//! Canonical analysis record and its field identifiers.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// One of the six canonical analysis fields, independent of upstream naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    Summary,
    MarketPotential,
    KeyRisks,
    Suggestions,
    FinalVerdict,
    ValidationStrategy,
}

impl CanonicalField {
    /// All fields in canonical order.
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::Summary,
        CanonicalField::MarketPotential,
        CanonicalField::KeyRisks,
        CanonicalField::Suggestions,
        CanonicalField::FinalVerdict,
        CanonicalField::ValidationStrategy,
    ];

    /// Canonical (camelCase) name, as used in diagnostics and serialized output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::MarketPotential => "marketPotential",
            Self::KeyRisks => "keyRisks",
            Self::Suggestions => "suggestions",
            Self::FinalVerdict => "finalVerdict",
            Self::ValidationStrategy => "validationStrategy",
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Summary => 0,
            Self::MarketPotential => 1,
            Self::KeyRisks => 2,
            Self::Suggestions => 3,
            Self::FinalVerdict => 4,
            Self::ValidationStrategy => 5,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for CanonicalField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A fully resolved analysis.
///
/// Only the normalizer can build one, and only when every canonical field was
/// resolved to a non-empty string, so holders never see a partial record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalAnalysis {
    values: [String; 6],
}

impl CanonicalAnalysis {
    pub(crate) fn from_resolved(values: [String; 6]) -> Self {
        Self { values }
    }

    pub fn get(&self, field: CanonicalField) -> &str {
        &self.values[field.index()]
    }

    pub fn summary(&self) -> &str {
        self.get(CanonicalField::Summary)
    }

    pub fn market_potential(&self) -> &str {
        self.get(CanonicalField::MarketPotential)
    }

    pub fn key_risks(&self) -> &str {
        self.get(CanonicalField::KeyRisks)
    }

    pub fn suggestions(&self) -> &str {
        self.get(CanonicalField::Suggestions)
    }

    pub fn final_verdict(&self) -> &str {
        self.get(CanonicalField::FinalVerdict)
    }

    pub fn validation_strategy(&self) -> &str {
        self.get(CanonicalField::ValidationStrategy)
    }

    pub fn verdict_tone(&self) -> VerdictTone {
        VerdictTone::of(self.final_verdict())
    }
}

impl Serialize for CanonicalAnalysis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CanonicalAnalysis", CanonicalField::ALL.len())?;
        for field in CanonicalField::ALL {
            state.serialize_field(field.name(), self.get(field))?;
        }
        state.end()
    }
}

/// Coarse reading of the free-text verdict, for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictTone {
    Promising,
    NeedsWork,
    Unfavorable,
}

impl VerdictTone {
    /// "promising" wins over "needs work" when both appear.
    pub fn of(verdict: &str) -> Self {
        let v = verdict.to_lowercase();
        if v.contains("promising") {
            VerdictTone::Promising
        } else if v.contains("needs work") {
            VerdictTone::NeedsWork
        } else {
            VerdictTone::Unfavorable
        }
    }
}
