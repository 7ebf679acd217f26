//! 生命周期事件：向 UI 层报告阶段变化、忙碌状态与最终结果。
//!
//! Lifecycle events and sinks.
//!
//! The orchestrator reports everything a presentation layer needs through one
//! [`LifecycleSink`]: phase transitions, the derived `busy` flag (for disabling
//! the submit control) and the single outcome of each accepted submission.
//!
//! | Sink | Description |
//! |------|-------------|
//! | [`NoopLifecycleSink`] | Default; drops every event |
//! | [`InMemoryLifecycleSink`] | Records events, for tests and UI adapters |
//! | [`TracingLifecycleSink`] | Emits each event as a `tracing` record |

use crate::client::state::RequestPhase;
use crate::types::CanonicalAnalysis;
use crate::OrchestrationError;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    PhaseChanged { from: RequestPhase, to: RequestPhase },
    /// Emitted only when the value changes.
    Busy(bool),
    Succeeded(CanonicalAnalysis),
    Failed(OrchestrationError),
}

/// Receiver for orchestrator lifecycle events.
///
/// Called synchronously from inside the orchestrator; implementations must not
/// block and must not call back into the orchestrator.
pub trait LifecycleSink: Send + Sync {
    fn notify(&self, event: &LifecycleEvent);
}

pub struct NoopLifecycleSink;

impl LifecycleSink for NoopLifecycleSink {
    fn notify(&self, _event: &LifecycleEvent) {}
}

pub fn noop_sink() -> Arc<dyn LifecycleSink> {
    Arc::new(NoopLifecycleSink)
}

/// In-memory sink for testing.
pub struct InMemoryLifecycleSink {
    events: RwLock<Vec<LifecycleEvent>>,
    max_events: usize,
}

impl InMemoryLifecycleSink {
    pub fn new(max: usize) -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            max_events: max.max(1),
        }
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.read().map(|e| e.clone()).unwrap_or_default()
    }

    /// Successive `busy` values, in emission order.
    pub fn busy_transitions(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                LifecycleEvent::Busy(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    /// Phases entered, in order.
    pub fn phases(&self) -> Vec<RequestPhase> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                LifecycleEvent::PhaseChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect()
    }

    /// Number of delivered outcomes (successes plus failures).
    pub fn outcomes(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::Succeeded(_) | LifecycleEvent::Failed(_)))
            .count()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.events.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LifecycleSink for InMemoryLifecycleSink {
    fn notify(&self, event: &LifecycleEvent) {
        if let Ok(mut events) = self.events.write() {
            events.push(event.clone());
            if events.len() > self.max_events {
                events.remove(0);
            }
        }
    }
}

/// Logs events through `tracing` at debug level (outcomes at info/warn).
pub struct TracingLifecycleSink;

impl LifecycleSink for TracingLifecycleSink {
    fn notify(&self, event: &LifecycleEvent) {
        match event {
            LifecycleEvent::PhaseChanged { from, to } => {
                tracing::debug!(from = %from, to = %to, "phase changed")
            }
            LifecycleEvent::Busy(busy) => tracing::debug!(busy = *busy, "busy changed"),
            LifecycleEvent::Succeeded(analysis) => tracing::info!(
                verdict_tone = ?analysis.verdict_tone(),
                "analysis delivered"
            ),
            LifecycleEvent::Failed(err) => tracing::warn!(
                kind = err.kind.name(),
                code = err.kind.code(),
                retryable = err.retryable,
                "analysis failed"
            ),
        }
    }
}

/// Fans events out to several sinks, in order.
pub struct CompositeLifecycleSink {
    sinks: Vec<Arc<dyn LifecycleSink>>,
}

impl CompositeLifecycleSink {
    pub fn new(sinks: Vec<Arc<dyn LifecycleSink>>) -> Self {
        Self { sinks }
    }
}

impl LifecycleSink for CompositeLifecycleSink {
    fn notify(&self, event: &LifecycleEvent) {
        for sink in &self.sinks {
            sink.notify(event);
        }
    }
}
