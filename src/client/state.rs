//! Request lifecycle state.

use crate::lifecycle::{LifecycleEvent, LifecycleSink};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Lifecycle phase of the (single) analysis action.
///
/// `Idle → Validating → Sending → {Normalizing → Complete} | {Classifying → Failed}`,
/// then back to `Idle` once the outcome is delivered. Validation and
/// normalization failures enter `Classifying` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestPhase {
    Idle,
    Validating,
    Sending,
    Normalizing,
    Classifying,
    Complete,
    Failed,
}

impl RequestPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Sending => "sending",
            Self::Normalizing => "normalizing",
            Self::Classifying => "classifying",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    /// The submit affordance is disabled in every phase but `Idle`.
    pub fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner of the current phase. Only the orchestrator writes it.
///
/// The lock is never held across an `.await` or while notifying the sink.
pub(crate) struct PhaseCell {
    phase: Mutex<RequestPhase>,
    sink: Arc<dyn LifecycleSink>,
}

impl PhaseCell {
    pub(crate) fn new(sink: Arc<dyn LifecycleSink>) -> Self {
        Self {
            phase: Mutex::new(RequestPhase::Idle),
            sink,
        }
    }

    pub(crate) fn current(&self) -> RequestPhase {
        match self.phase.lock() {
            Ok(p) => *p,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Atomically move `Idle → Validating`. Returns the blocking phase otherwise.
    pub(crate) fn try_begin(&self) -> Result<(), RequestPhase> {
        {
            let mut phase = match self.phase.lock() {
                Ok(p) => p,
                Err(poisoned) => poisoned.into_inner(),
            };
            if *phase != RequestPhase::Idle {
                return Err(*phase);
            }
            *phase = RequestPhase::Validating;
        }
        self.announce(RequestPhase::Idle, RequestPhase::Validating);
        Ok(())
    }

    pub(crate) fn transition(&self, to: RequestPhase) {
        let from = {
            let mut phase = match self.phase.lock() {
                Ok(p) => p,
                Err(poisoned) => poisoned.into_inner(),
            };
            std::mem::replace(&mut *phase, to)
        };
        if from != to {
            self.announce(from, to);
        }
    }

    pub(crate) fn notify(&self, event: LifecycleEvent) {
        self.sink.notify(&event);
    }

    fn announce(&self, from: RequestPhase, to: RequestPhase) {
        tracing::debug!(from = %from, to = %to, "request phase transition");
        self.sink.notify(&LifecycleEvent::PhaseChanged { from, to });
        if from.is_busy() != to.is_busy() {
            self.sink.notify(&LifecycleEvent::Busy(to.is_busy()));
        }
    }
}

/// Returns the cell to `Idle` when dropped, so an abandoned submission
/// cannot leave the orchestrator wedged in a busy phase.
pub(crate) struct IdleOnDrop<'a> {
    cell: &'a PhaseCell,
}

impl<'a> IdleOnDrop<'a> {
    pub(crate) fn new(cell: &'a PhaseCell) -> Self {
        Self { cell }
    }
}

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.cell.transition(RequestPhase::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::InMemoryLifecycleSink;

    #[test]
    fn begin_is_exclusive() {
        let cell = PhaseCell::new(crate::lifecycle::noop_sink());
        assert!(cell.try_begin().is_ok());
        assert_eq!(cell.try_begin(), Err(RequestPhase::Validating));
        cell.transition(RequestPhase::Sending);
        assert_eq!(cell.try_begin(), Err(RequestPhase::Sending));
        cell.transition(RequestPhase::Idle);
        assert!(cell.try_begin().is_ok());
    }

    #[test]
    fn busy_is_emitted_only_on_change() {
        let sink = Arc::new(InMemoryLifecycleSink::new(64));
        let cell = PhaseCell::new(sink.clone());
        cell.try_begin().unwrap();
        cell.transition(RequestPhase::Sending);
        cell.transition(RequestPhase::Normalizing);
        cell.transition(RequestPhase::Complete);
        cell.transition(RequestPhase::Idle);
        assert_eq!(sink.busy_transitions(), vec![true, false]);
        assert_eq!(
            sink.phases(),
            vec![
                RequestPhase::Validating,
                RequestPhase::Sending,
                RequestPhase::Normalizing,
                RequestPhase::Complete,
                RequestPhase::Idle,
            ]
        );
    }

    #[test]
    fn only_complete_and_failed_are_terminal() {
        let terminal: Vec<_> = [
            RequestPhase::Idle,
            RequestPhase::Validating,
            RequestPhase::Sending,
            RequestPhase::Normalizing,
            RequestPhase::Classifying,
            RequestPhase::Complete,
            RequestPhase::Failed,
        ]
        .into_iter()
        .filter(RequestPhase::is_terminal)
        .collect();
        assert_eq!(terminal, vec![RequestPhase::Complete, RequestPhase::Failed]);
        assert!(RequestPhase::Complete.is_busy());
    }

    #[test]
    fn guard_restores_idle() {
        let cell = PhaseCell::new(crate::lifecycle::noop_sink());
        cell.try_begin().unwrap();
        {
            let _guard = IdleOnDrop::new(&cell);
            cell.transition(RequestPhase::Sending);
        }
        assert_eq!(cell.current(), RequestPhase::Idle);
    }
}
