use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// The untyped JSON object returned by the analysis service.
pub type RawResponse = serde_json::Map<String, serde_json::Value>;

/// Outbound request body, built once per submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestPayload {
    idea: String,
    timestamp: String,
}

impl RequestPayload {
    /// Stamps `idea` with the current UTC time (RFC 3339, millisecond precision).
    ///
    /// The idea is expected to be validated already; see
    /// [`crate::client::validation::validate_idea`].
    pub fn new(idea: impl Into<String>) -> Self {
        Self {
            idea: idea.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn idea(&self) -> &str {
        &self.idea
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}
