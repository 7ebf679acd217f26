//! 传输层：向分析服务发送单次 HTTP 请求并校验协议层响应。
//!
//! Transport layer.
//!
//! [`AnalysisTransport`] is the seam between the orchestrator and the network.
//! Implementations perform exactly one call per invocation and report
//! protocol-level problems (status, content type, body shape) as typed errors;
//! they never retry and never apply their own deadline.

pub mod http;

pub use http::HttpTransport;

use crate::types::{RawResponse, RequestPayload};
use crate::Result;
use async_trait::async_trait;
use url::Url;

#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// POST `payload` to `endpoint` and return the JSON object body.
    async fn send(&self, endpoint: &Url, payload: &RequestPayload) -> Result<RawResponse>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether the HTTP layer gave up because of its own timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Http(e) if e.is_timeout())
    }
}
