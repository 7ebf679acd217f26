//! 类型模块：分析请求与规范化结果的核心数据类型。
//!
//! # Types Module
//!
//! Core data types that flow through the orchestrator.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RequestPayload`] | Outbound body: trimmed idea plus submission timestamp |
//! | [`RawResponse`] | Untyped JSON object returned by the analysis service |
//! | [`CanonicalField`] | One of the six canonical analysis fields |
//! | [`CanonicalAnalysis`] | Fully resolved analysis record |
//! | [`VerdictTone`] | Coarse bucket of the final verdict |
//!
//! ## Example
//!
//! ```rust
//! use idea_analyzer::types::RequestPayload;
//!
//! let payload = RequestPayload::new("A meal planning app");
//! assert_eq!(payload.idea(), "A meal planning app");
//! assert!(payload.timestamp().ends_with('Z'));
//! ```

pub mod analysis;
pub mod payload;

pub use analysis::{CanonicalAnalysis, CanonicalField, VerdictTone};
pub use payload::{RawResponse, RequestPayload};
