use crate::client::error_classification::{classify, OrchestrationError};
use crate::client::execution;
use crate::client::state::{IdleOnDrop, PhaseCell, RequestPhase};
use crate::client::validation::validate_idea;
use crate::config::AnalyzerConfig;
use crate::error_code::ErrorKind;
use crate::lifecycle::LifecycleEvent;
use crate::normalize::{field_names, normalize};
use crate::transport::AnalysisTransport;
use crate::types::{CanonicalAnalysis, RequestPayload};
use crate::Result;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Orchestrates one analysis action at a time against the remote service.
///
/// Every accepted submission yields exactly one [`AnalysisOutcome`]; a
/// submission made while another is in flight is rejected without touching
/// the network.
pub struct AnalysisOrchestrator {
    pub(crate) config: AnalyzerConfig,
    pub(crate) transport: Arc<dyn AnalysisTransport>,
    pub(crate) state: PhaseCell,
}

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Complete(CanonicalAnalysis),
    Failed(OrchestrationError),
}

impl AnalysisOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, AnalysisOutcome::Complete(_))
    }

    pub fn analysis(&self) -> Option<&CanonicalAnalysis> {
        match self {
            AnalysisOutcome::Complete(a) => Some(a),
            AnalysisOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&OrchestrationError> {
        match self {
            AnalysisOutcome::Complete(_) => None,
            AnalysisOutcome::Failed(e) => Some(e),
        }
    }

    pub fn into_result(self) -> std::result::Result<CanonicalAnalysis, OrchestrationError> {
        match self {
            AnalysisOutcome::Complete(a) => Ok(a),
            AnalysisOutcome::Failed(e) => Err(e),
        }
    }
}

/// A submission refused because the orchestrator was not idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("an analysis request is already in flight (phase: {phase})")]
pub struct SubmitRejected {
    pub phase: RequestPhase,
}

impl AnalysisOrchestrator {
    /// Orchestrator over the HTTP transport, with no lifecycle sink.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        crate::client::builder::AnalysisOrchestratorBuilder::new()
            .config(config)
            .build()
    }

    pub fn builder() -> crate::client::builder::AnalysisOrchestratorBuilder {
        crate::client::builder::AnalysisOrchestratorBuilder::new()
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn phase(&self) -> RequestPhase {
        self.state.current()
    }

    /// Whether the submit affordance should be disabled right now.
    pub fn is_busy(&self) -> bool {
        self.phase().is_busy()
    }

    /// Run one analysis action for `text`.
    ///
    /// Returns `Err(SubmitRejected)` without any side effect if a previous
    /// submission is still outstanding. Otherwise the outcome is also reported
    /// to the lifecycle sink before this returns, and the orchestrator is back
    /// in [`RequestPhase::Idle`].
    pub async fn submit(&self, text: &str) -> std::result::Result<AnalysisOutcome, SubmitRejected> {
        if let Err(phase) = self.state.try_begin() {
            warn!(phase = %phase, "submission rejected: analysis already in flight");
            return Err(SubmitRejected { phase });
        }
        let _idle = IdleOnDrop::new(&self.state);
        let request_id = Uuid::new_v4().to_string();

        let outcome = match self.run(text, &request_id).await {
            Ok(analysis) => {
                self.state.transition(RequestPhase::Complete);
                self.state.notify(LifecycleEvent::Succeeded(analysis.clone()));
                AnalysisOutcome::Complete(analysis)
            }
            Err(failure) => {
                self.state.transition(RequestPhase::Classifying);
                let err = classify(&failure);
                self.log_failure(&request_id, &err);
                self.state.transition(RequestPhase::Failed);
                self.state.notify(LifecycleEvent::Failed(err.clone()));
                AnalysisOutcome::Failed(err)
            }
        };

        Ok(outcome)
    }

    async fn run(&self, text: &str, request_id: &str) -> Result<CanonicalAnalysis> {
        let endpoint = self.config.resolve_endpoint()?;
        let idea = validate_idea(text)?;
        let payload = RequestPayload::new(idea);

        self.state.transition(RequestPhase::Sending);
        let raw = execution::dispatch(
            self.transport.clone(),
            endpoint,
            payload,
            self.config.timeout(),
            request_id,
        )
        .await?;

        self.state.transition(RequestPhase::Normalizing);
        Ok(normalize(&raw)?)
    }

    fn log_failure(&self, request_id: &str, err: &OrchestrationError) {
        let diagnostic = err.diagnostic.as_deref().unwrap_or("");
        match err.kind {
            ErrorKind::IncompleteResponseError => warn!(
                request_id,
                code = err.kind.code(),
                category = err.kind.category(),
                missing = field_names(&err.missing).as_str(),
                "analysis service returned incomplete data"
            ),
            ErrorKind::ConfigurationError | ErrorKind::UnknownError => warn!(
                request_id,
                code = err.kind.code(),
                category = err.kind.category(),
                diagnostic,
                "analysis failed"
            ),
            _ => info!(
                request_id,
                code = err.kind.code(),
                category = err.kind.category(),
                kind = err.kind.name(),
                status = err.status.unwrap_or(0),
                retryable = err.retryable,
                diagnostic,
                "analysis failed"
            ),
        }
    }
}
