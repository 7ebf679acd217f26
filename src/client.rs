//! Analysis request orchestration.
//!
//! Keep the public surface small and predictable: callers build an
//! [`AnalysisOrchestrator`], call `submit`, and observe lifecycle events.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod error_classification;
mod execution;
pub mod state;
pub mod validation;

pub use builder::AnalysisOrchestratorBuilder;
pub use core::{AnalysisOrchestrator, AnalysisOutcome, SubmitRejected};
pub use error_classification::{classify, OrchestrationError};
pub use state::RequestPhase;
pub use validation::{validate_idea, InputGauge, ValidationFailure, MAX_IDEA_CHARS};
