//! Error kinds surfaced to callers of the orchestrator.
//!
//! Every failure is reduced to one of these kinds. Each kind carries a stable
//! code for logs, a category, a default retry hint and exactly one
//! user-facing message template.
//!
//! ## Error Code Categories
//!
//! | Prefix | Category      | Description                               |
//! |--------|---------------|-------------------------------------------|
//! | E1xxx  | configuration | Operator-side setup problems              |
//! | E2xxx  | input         | User input rejected before any network IO |
//! | E3xxx  | network       | Deadline or connectivity failures         |
//! | E4xxx  | protocol      | Response received but unusable            |
//! | E5xxx  | upstream      | Response usable but semantically broken   |
//! | E9xxx  | unknown       | Catch-all / unclassified                  |
//!
//! ## Example
//!
//! ```rust
//! use idea_analyzer::error_code::ErrorKind;
//!
//! let kind = ErrorKind::from_http_status(429);
//! assert_eq!(kind.code(), "E4001");
//! assert!(kind.retryable());
//! assert_eq!(kind.category(), "protocol");
//! ```

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// E1001: Service endpoint unset, invalid or still a placeholder
    ConfigurationError,
    /// E2001: Input empty or over the length limit
    ValidationError,
    /// E3001: No response within the configured deadline
    TimeoutError,
    /// E3002: The network call could not be completed
    TransportError,
    /// E4001: HTTP 429
    RateLimited,
    /// E4002: HTTP 5xx
    ServiceUnavailable,
    /// E4003: Other non-2xx status, non-JSON content type or malformed body
    ProtocolError,
    /// E5001: Response lacked one or more canonical fields
    IncompleteResponseError,
    /// E9999: Error could not be classified
    UnknownError,
}

impl ErrorKind {
    /// Returns the canonical code string (e.g., `"E4001"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "E1001",
            Self::ValidationError => "E2001",
            Self::TimeoutError => "E3001",
            Self::TransportError => "E3002",
            Self::RateLimited => "E4001",
            Self::ServiceUnavailable => "E4002",
            Self::ProtocolError => "E4003",
            Self::IncompleteResponseError => "E5001",
            Self::UnknownError => "E9999",
        }
    }

    /// Returns the standard name (e.g., `"rate_limited"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "configuration_error",
            Self::ValidationError => "validation_error",
            Self::TimeoutError => "timeout_error",
            Self::TransportError => "transport_error",
            Self::RateLimited => "rate_limited",
            Self::ServiceUnavailable => "service_unavailable",
            Self::ProtocolError => "protocol_error",
            Self::IncompleteResponseError => "incomplete_response_error",
            Self::UnknownError => "unknown_error",
        }
    }

    /// Returns whether resubmitting the same input may succeed.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::TimeoutError | Self::TransportError | Self::RateLimited | Self::ServiceUnavailable
        )
    }

    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "configuration",
            Self::ValidationError => "input",
            Self::TimeoutError | Self::TransportError => "network",
            Self::RateLimited | Self::ServiceUnavailable | Self::ProtocolError => "protocol",
            Self::IncompleteResponseError => "upstream",
            Self::UnknownError => "unknown",
        }
    }

    /// The fixed user-facing message for this kind.
    ///
    /// `ValidationError` is the only kind whose message depends on the
    /// violated constraint; see [`crate::client::validation::ValidationFailure::user_message`].
    pub fn message_template(&self) -> &'static str {
        match self {
            Self::ConfigurationError => {
                "Configuration error: Analysis service URL not set. Please contact support."
            }
            Self::ValidationError => "Your idea description is not valid. Please revise it.",
            Self::TimeoutError => "Analysis is taking longer than expected. Please try again.",
            Self::TransportError => {
                "Network error: Unable to reach analysis service. Please check your connection."
            }
            Self::RateLimited => "Too many requests. Please wait a moment and try again.",
            Self::ServiceUnavailable => {
                "Analysis service is temporarily unavailable. Please try again later."
            }
            Self::ProtocolError => "Received an invalid response from the analysis service.",
            Self::IncompleteResponseError => {
                "Analysis service returned incomplete data. Please contact support if this persists."
            }
            Self::UnknownError => "An unexpected error occurred during analysis. Please try again.",
        }
    }

    /// Maps a non-success HTTP status to its kind.
    ///
    /// 429 and 5xx are singled out; every other status is a generic protocol error.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            500..=599 => Self::ServiceUnavailable,
            _ => Self::ProtocolError,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
