use crate::config::AnalyzerConfig;
use crate::transport::{AnalysisTransport, TransportError};
use crate::types::{RawResponse, RequestPayload};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::Proxy;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

const JSON_MIME: &str = "application/json";

/// reqwest-backed transport for the analysis service.
///
/// No request timeout is configured on the client: the orchestrator's deadline
/// is the only cancellation trigger.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &AnalyzerConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(config.pool_idle_timeout_secs)))
            .user_agent(concat!("idea-analyzer/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy_url) = config.proxy_url.as_deref() {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy URL: {}", e),
                    ErrorContext::new()
                        .with_field_path("config.proxy_url")
                        .with_source("http_transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client })
    }

    /// Wrap an existing client (shared pools, custom TLS, tests).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn header_first(headers: &HeaderMap, name: impl reqwest::header::AsHeaderName) -> Option<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Best-effort parsing of `Retry-After`.
    ///
    /// Only the `Retry-After: <seconds>` form is supported.
    fn retry_after_ms(headers: &HeaderMap) -> Option<u32> {
        let raw = Self::header_first(headers, RETRY_AFTER)?;
        let secs: u32 = raw.parse().ok()?;
        Some(secs.saturating_mul(1000))
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn send(&self, endpoint: &Url, payload: &RequestPayload) -> Result<RawResponse> {
        let resp = self
            .client
            .post(endpoint.clone())
            .header(CONTENT_TYPE, JSON_MIME)
            .header(ACCEPT, JSON_MIME)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = resp.status();
        let headers = resp.headers().clone();
        debug!(http_status = status.as_u16(), "analysis service responded");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Remote {
                status: status.as_u16(),
                body,
                retry_after_ms: Self::retry_after_ms(&headers),
            });
        }

        let content_type = Self::header_first(&headers, CONTENT_TYPE);
        if !content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains(JSON_MIME))
            .unwrap_or(false)
        {
            return Err(Error::UnexpectedContentType { content_type });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let json: Value = serde_json::from_slice(&body).map_err(|e| {
            Error::malformed_with_context(
                format!("failed to parse response JSON: {}", e),
                ErrorContext::new().with_source("json_parse"),
            )
        })?;

        match json {
            Value::Object(map) => Ok(map),
            other => Err(Error::malformed_with_context(
                "expected a JSON object",
                ErrorContext::new()
                    .with_details(format!("got {}", json_type_name(&other)))
                    .with_source("json_parse"),
            )),
        }
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
