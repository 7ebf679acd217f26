use crate::client::core::AnalysisOrchestrator;
use crate::client::state::PhaseCell;
use crate::config::AnalyzerConfig;
use crate::lifecycle::LifecycleSink;
use crate::transport::{AnalysisTransport, HttpTransport};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`AnalysisOrchestrator`].
///
/// Keep this surface area small and predictable.
pub struct AnalysisOrchestratorBuilder {
    config: AnalyzerConfig,
    transport: Option<Arc<dyn AnalysisTransport>>,
    sink: Arc<dyn LifecycleSink>,
}

impl AnalysisOrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            transport: None,
            sink: crate::lifecycle::noop_sink(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    /// Override the request deadline (default 30 s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Treat endpoints containing `pattern` as unconfigured.
    pub fn placeholder_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.placeholder_patterns.push(pattern.into());
        self
    }

    /// Inject a transport. Defaults to [`HttpTransport`] built from the config.
    pub fn transport(mut self, transport: Arc<dyn AnalysisTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Inject a lifecycle sink. Default is a no-op sink.
    pub fn sink(mut self, sink: Arc<dyn LifecycleSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Build the orchestrator.
    ///
    /// The endpoint is not checked here; an unusable endpoint is reported as
    /// a configuration error by the first submission.
    pub fn build(self) -> Result<AnalysisOrchestrator> {
        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&self.config)?),
        };

        Ok(AnalysisOrchestrator {
            config: self.config,
            transport,
            state: PhaseCell::new(self.sink),
        })
    }
}

impl Default for AnalysisOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
