//! 请求执行逻辑：单次网络调用与超时计时器的竞争。
//!
//! Request execution logic (single attempt, deadline-bounded).
//!
//! The network call and the deadline timer run as separate tasks and report
//! through one [`CommitPoint`]. Whichever commits first decides the outcome;
//! the other side's result is dropped.

use crate::transport::AnalysisTransport;
use crate::types::{RawResponse, RequestPayload};
use crate::{Error, ErrorContext, Result};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

pub(crate) enum Settled {
    Response(Result<RawResponse>),
    TimedOut,
}

/// Take-once slot deciding the timer/network race.
pub(crate) struct CommitPoint<T> {
    slot: Mutex<Option<oneshot::Sender<T>>>,
}

impl<T> CommitPoint<T> {
    pub(crate) fn new() -> (Self, oneshot::Receiver<T>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                slot: Mutex::new(Some(tx)),
            },
            rx,
        )
    }

    /// Returns `false` if another party already committed (or nobody is listening).
    pub(crate) fn commit(&self, value: T) -> bool {
        let sender = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match sender {
            Some(tx) => tx.send(value).is_ok(),
            None => false,
        }
    }
}

struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Issue exactly one request and wait for it, bounded by `deadline`.
///
/// Dropping the returned future cancels the outstanding request.
pub(crate) async fn dispatch(
    transport: Arc<dyn AnalysisTransport>,
    endpoint: Url,
    payload: RequestPayload,
    deadline: Duration,
    request_id: &str,
) -> Result<RawResponse> {
    let (commit, mut settled) = CommitPoint::new();
    let commit = Arc::new(commit);
    let cancel = CancellationToken::new();
    let _cancel_on_exit = cancel.clone().drop_guard();
    let host = endpoint.host_str().unwrap_or("").to_string();
    let start = Instant::now();

    info!(
        request_id,
        endpoint = host.as_str(),
        idea_chars = payload.idea().chars().count(),
        "analysis request started"
    );

    let mut network = {
        let commit = commit.clone();
        let cancel = cancel.clone();
        let request_id = request_id.to_string();
        tokio::spawn(async move {
            let result = tokio::select! {
                r = transport.send(&endpoint, &payload) => r,
                _ = cancel.cancelled() => return,
            };
            if !commit.commit(Settled::Response(result)) {
                debug!(request_id = request_id.as_str(), "discarding late analysis response");
            }
        })
    };

    let timer = {
        let commit = commit.clone();
        let cancel = cancel.clone();
        AbortOnDrop(tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            if commit.commit(Settled::TimedOut) {
                cancel.cancel();
            }
        }))
    };

    // A network task that ends without committing (panic) settles as unknown.
    let first = tokio::select! {
        biased;
        s = &mut settled => Some(s),
        joined = &mut network => {
            if let Err(e) = joined {
                let reason = if e.is_panic() {
                    "analysis task panicked"
                } else {
                    "analysis task was cancelled"
                };
                commit.commit(Settled::Response(Err(Error::unknown_with_context(
                    reason,
                    ErrorContext::new().with_source("dispatch"),
                ))));
            }
            None
        }
    };
    let settled = match first {
        Some(s) => s,
        None => settled.await,
    };
    drop(timer);
    let duration_ms = start.elapsed().as_millis();

    match settled {
        Ok(Settled::Response(result)) => {
            match &result {
                Ok(_) => info!(
                    request_id,
                    endpoint = host.as_str(),
                    duration_ms,
                    "analysis request completed"
                ),
                Err(e) => info!(
                    request_id,
                    endpoint = host.as_str(),
                    http_status = e.status().unwrap_or(0),
                    duration_ms,
                    "analysis request failed"
                ),
            }
            result
        }
        Ok(Settled::TimedOut) => {
            let after_ms = deadline.as_millis().min(u64::MAX as u128) as u64;
            info!(
                request_id,
                endpoint = host.as_str(),
                deadline_ms = after_ms,
                "analysis request timed out"
            );
            Err(Error::Timeout { after_ms })
        }
        Err(_) => Err(Error::unknown_with_context(
            "request task ended without reporting an outcome",
            ErrorContext::new().with_source("dispatch"),
        )),
    }
}
