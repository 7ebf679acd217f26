//! Error classification logic

use crate::client::validation::ValidationFailure;
use crate::error_code::ErrorKind;
use crate::types::CanonicalField;
use crate::Error;
use serde::Serialize;
use std::time::Duration;

/// The classified failure delivered to callers.
///
/// `message` is always one of the fixed user-facing templates. Raw response
/// bodies and internal error text only ever appear in `diagnostic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct OrchestrationError {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<CanonicalField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<Duration>,
    #[serde(skip)]
    pub diagnostic: Option<String>,
}

impl OrchestrationError {
    fn of_kind(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.message_template().to_string(),
            retryable: kind.retryable(),
            status: None,
            missing: Vec::new(),
            retry_after: None,
            diagnostic: None,
        }
    }

    fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    fn validation(failure: &ValidationFailure) -> Self {
        let mut err = Self::of_kind(ErrorKind::ValidationError);
        err.message = failure.user_message();
        err
    }
}

/// Reduce any internal failure to a classified, user-facing error.
///
/// Precedence when a failure could match several kinds: configuration,
/// validation, timeout, transport, protocol, incomplete response, unknown.
pub fn classify(failure: &Error) -> OrchestrationError {
    let diagnostic = failure.to_string();

    match failure {
        Error::Configuration { .. } => {
            OrchestrationError::of_kind(ErrorKind::ConfigurationError).with_diagnostic(diagnostic)
        }
        Error::Validation(v) => OrchestrationError::validation(v).with_diagnostic(diagnostic),
        Error::Timeout { .. } => {
            OrchestrationError::of_kind(ErrorKind::TimeoutError).with_diagnostic(diagnostic)
        }
        Error::Transport(t) if t.is_timeout() => {
            OrchestrationError::of_kind(ErrorKind::TimeoutError).with_diagnostic(diagnostic)
        }
        Error::Transport(_) => {
            OrchestrationError::of_kind(ErrorKind::TransportError).with_diagnostic(diagnostic)
        }
        Error::Remote {
            status,
            retry_after_ms,
            ..
        } => {
            let kind = ErrorKind::from_http_status(*status);
            let mut err = OrchestrationError::of_kind(kind).with_diagnostic(diagnostic);
            err.status = Some(*status);
            if kind == ErrorKind::RateLimited {
                err.retry_after = retry_after_ms.map(|ms| Duration::from_millis(u64::from(ms)));
            }
            err
        }
        Error::UnexpectedContentType { .. } | Error::MalformedBody { .. } => {
            OrchestrationError::of_kind(ErrorKind::ProtocolError).with_diagnostic(diagnostic)
        }
        Error::Incomplete(incomplete) => {
            let mut err = OrchestrationError::of_kind(ErrorKind::IncompleteResponseError)
                .with_diagnostic(diagnostic);
            err.missing = incomplete.missing.clone();
            err
        }
        Error::Io(_) | Error::Unknown { .. } => {
            OrchestrationError::of_kind(ErrorKind::UnknownError).with_diagnostic(diagnostic)
        }
    }
}
