//! 配置：分析服务端点、超时与代理设置（支持环境变量与 YAML 文件）。
//!
//! Analyzer configuration.
//!
//! The only required value is the analysis service endpoint. It is resolved
//! lazily at submission time, so a missing or placeholder endpoint surfaces as
//! a classified configuration error rather than a construction failure.
//!
//! Environment variables:
//! - `IDEA_ANALYZER_ENDPOINT`: service URL
//! - `IDEA_ANALYZER_TIMEOUT_MS`: request deadline (default 30000)
//! - `IDEA_ANALYZER_PROXY_URL`: optional HTTP(S) proxy

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const ENV_ENDPOINT: &str = "IDEA_ANALYZER_ENDPOINT";
pub const ENV_TIMEOUT_MS: &str = "IDEA_ANALYZER_TIMEOUT_MS";
pub const ENV_PROXY_URL: &str = "IDEA_ANALYZER_PROXY_URL";

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Endpoint fragments left behind by setup templates.
pub const BUILTIN_PLACEHOLDERS: &[&str] = &[
    "your-n8n-instance.com",
    "your-actual-n8n-webhook-url.com",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
    /// Extra placeholder fragments, checked in addition to [`BUILTIN_PLACEHOLDERS`].
    pub placeholder_patterns: Vec<String>,
    pub proxy_url: Option<String>,
    pub pool_idle_timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            placeholder_patterns: Vec::new(),
            proxy_url: None,
            pool_idle_timeout_secs: 90,
        }
    }
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    /// Defaults overridden by whatever is set in the environment.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment variables on top of the current values.
    ///
    /// Unparsable numeric values are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(|name| env::var(name).ok())
    }

    /// Apply overrides looked up by variable name through `get`.
    ///
    /// Blank values count as unset; an unparsable timeout keeps the current value.
    pub fn apply_overrides(mut self, get: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| {
            get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = Some(endpoint);
        }
        if let Some(ms) = lookup(ENV_TIMEOUT_MS).and_then(|s| s.parse::<u64>().ok()) {
            self.timeout_ms = ms;
        }
        if let Some(proxy) = lookup(ENV_PROXY_URL) {
            self.proxy_url = Some(proxy);
        }
        self
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str::<AnalyzerConfig>(content).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid analyzer config: {}", e),
                ErrorContext::new().with_source("config_loader"),
            )
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message,
                context: context.with_field_path(path.display().to_string()),
            },
            other => other,
        })
    }

    /// Request deadline. A zero value falls back to the default.
    pub fn timeout(&self) -> Duration {
        match self.timeout_ms {
            0 => Duration::from_millis(DEFAULT_TIMEOUT_MS),
            ms => Duration::from_millis(ms),
        }
    }

    pub fn is_placeholder(&self, endpoint: &str) -> bool {
        let lowered = endpoint.to_lowercase();
        BUILTIN_PLACEHOLDERS
            .iter()
            .map(|p| p.to_string())
            .chain(self.placeholder_patterns.iter().map(|p| p.to_lowercase()))
            .filter(|p| !p.trim().is_empty())
            .any(|p| lowered.contains(&p))
    }

    /// Parse and vet the configured endpoint.
    pub fn resolve_endpoint(&self) -> Result<Url> {
        let raw = self
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "analysis service endpoint is not set",
                    ErrorContext::new()
                        .with_field_path("config.endpoint")
                        .with_details(format!("set {}", ENV_ENDPOINT))
                        .with_source("endpoint_resolver"),
                )
            })?;

        if self.is_placeholder(raw) {
            return Err(Error::configuration_with_context(
                "analysis service endpoint is still a placeholder",
                ErrorContext::new()
                    .with_field_path("config.endpoint")
                    .with_details(raw.to_string())
                    .with_source("endpoint_resolver"),
            ));
        }

        let url = Url::parse(raw).map_err(|e| {
            Error::configuration_with_context(
                format!("analysis service endpoint is not a valid URL: {}", e),
                ErrorContext::new()
                    .with_field_path("config.endpoint")
                    .with_source("endpoint_resolver"),
            )
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                format!("unsupported endpoint scheme: {}", url.scheme()),
                ErrorContext::new()
                    .with_field_path("config.endpoint")
                    .with_source("endpoint_resolver"),
            ));
        }

        Ok(url)
    }
}
