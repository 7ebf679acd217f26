//! # idea-analyzer
//!
//! 创业想法分析请求编排器：校验输入、单次请求、超时控制、响应规范化与错误分类。
//!
//! Request orchestrator for a remote startup-idea analysis service.
//!
//! ## Overview
//!
//! The analysis service is not under our control: its field names drift, its
//! payloads may be partial, and it can fail at the network, protocol or
//! semantic layer. This crate turns one free-text submission into exactly one
//! of two things:
//!
//! - a [`CanonicalAnalysis`] with all six canonical fields resolved, or
//! - an [`OrchestrationError`] with a bounded [`ErrorKind`], a fixed
//!   user-facing message and a `retryable` hint.
//!
//! ## Key Features
//!
//! - **Single-flight**: [`AnalysisOrchestrator::submit`] refuses to start a
//!   second request while one is outstanding
//! - **Deadline**: one 30 s timer per request; a late response after the
//!   deadline is discarded
//! - **Alias normalization**: see [`normalize`] for the accepted upstream keys
//! - **Lifecycle events**: phase changes and the derived `busy` flag through
//!   one [`lifecycle::LifecycleSink`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use idea_analyzer::{AnalysisOrchestrator, AnalysisOutcome};
//!
//! #[tokio::main]
//! async fn main() -> idea_analyzer::Result<()> {
//!     let orchestrator = AnalysisOrchestrator::builder()
//!         .endpoint("https://hooks.example.com/webhook/startup-evaluator")
//!         .build()?;
//!
//!     match orchestrator.submit("A meal planning app").await {
//!         Ok(AnalysisOutcome::Complete(analysis)) => println!("{}", analysis.final_verdict()),
//!         Ok(AnalysisOutcome::Failed(err)) => eprintln!("{}", err.message),
//!         Err(busy) => eprintln!("{}", busy),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Orchestrator, lifecycle state, validation and classification |
//! | [`config`] | Endpoint, deadline and proxy configuration |
//! | [`normalize`] | Alias table and response normalization |
//! | [`transport`] | Transport seam and the reqwest-backed implementation |
//! | [`types`] | Payload and canonical analysis types |
//! | [`lifecycle`] | Lifecycle events and sinks |
//! | [`error_code`] | Error kinds, codes and message templates |

pub mod client;
pub mod config;
pub mod error_code;
pub mod lifecycle;
pub mod normalize;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{
    classify, AnalysisOrchestrator, AnalysisOrchestratorBuilder, AnalysisOutcome,
    OrchestrationError, RequestPhase, SubmitRejected,
};
pub use config::AnalyzerConfig;
pub use error_code::ErrorKind;
pub use lifecycle::{LifecycleEvent, LifecycleSink};
pub use types::{CanonicalAnalysis, CanonicalField, RawResponse, RequestPayload, VerdictTone};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
