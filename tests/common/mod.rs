//! Shared fixtures: a mockito-backed analysis service and a scripted in-process transport.

#![allow(dead_code)]

use async_trait::async_trait;
use idea_analyzer::lifecycle::InMemoryLifecycleSink;
use idea_analyzer::transport::AnalysisTransport;
use idea_analyzer::{AnalysisOrchestrator, Error, RawResponse, RequestPayload};
use mockito::{Mock, Server, ServerGuard};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const HOOK_PATH: &str = "/webhook/startup-evaluator";

/// A complete response using the primary key for every field.
pub fn full_response() -> Value {
    json!({
        "summary": "A subscription app that plans weekly meals.",
        "market_potential": "Large and growing.",
        "key_risks": "Crowded market.",
        "suggestions": "Partner with grocery chains.",
        "final_verdict": "Promising",
        "validation_strategy": "Run a landing page test.",
    })
}

pub fn as_object(v: Value) -> RawResponse {
    v.as_object().cloned().expect("fixture must be a JSON object")
}

/// Test fixture that manages a mock analysis service.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub endpoint: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let endpoint = format!("{}{}", server.url(), HOOK_PATH);
        Self { server, endpoint }
    }

    /// Orchestrator pointed at the mock server over real HTTP.
    pub fn orchestrator(&self, sink: Arc<InMemoryLifecycleSink>) -> AnalysisOrchestrator {
        AnalysisOrchestrator::builder()
            .endpoint(self.endpoint.clone())
            .sink(sink)
            .build()
            .expect("failed to build orchestrator")
    }

    pub async fn mock_json_response(&mut self, status: usize, body: &Value) -> Mock {
        self.server
            .mock("POST", HOOK_PATH)
            .with_status(status)
            .with_header("content-type", "application/json; charset=utf-8")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    pub async fn mock_raw_response(
        &mut self,
        status: usize,
        content_type: &str,
        body: &str,
    ) -> Mock {
        self.server
            .mock("POST", HOOK_PATH)
            .with_status(status)
            .with_header("content-type", content_type)
            .with_body(body)
            .create_async()
            .await
    }
}

type Responder = Box<dyn Fn() -> idea_analyzer::Result<RawResponse> + Send + Sync>;

/// In-process transport with a fixed delay and scripted response.
pub struct FakeTransport {
    delay: Duration,
    respond: Responder,
    calls: AtomicUsize,
    completed: AtomicUsize,
    last_idea: Mutex<Option<String>>,
}

impl FakeTransport {
    pub fn new(delay: Duration, respond: Responder) -> Arc<Self> {
        Arc::new(Self {
            delay,
            respond,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            last_idea: Mutex::new(None),
        })
    }

    pub fn json(delay: Duration, body: Value) -> Arc<Self> {
        let raw = as_object(body);
        Self::new(delay, Box::new(move || Ok(raw.clone())))
    }

    pub fn success(delay: Duration) -> Arc<Self> {
        Self::json(delay, full_response())
    }

    pub fn status(delay: Duration, status: u16) -> Arc<Self> {
        Self::new(
            delay,
            Box::new(move || {
                Err(Error::Remote {
                    status,
                    body: String::new(),
                    retry_after_ms: None,
                })
            }),
        )
    }

    /// Requests issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests that ran to completion (were not cancelled).
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn last_idea(&self) -> Option<String> {
        self.last_idea.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisTransport for FakeTransport {
    async fn send(
        &self,
        _endpoint: &Url,
        payload: &RequestPayload,
    ) -> idea_analyzer::Result<RawResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_idea.lock().unwrap() = Some(payload.idea().to_string());
        tokio::time::sleep(self.delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        (self.respond)()
    }
}

pub const FAKE_ENDPOINT: &str = "https://hooks.example.com/webhook/startup-evaluator";

pub fn orchestrator_with(
    transport: Arc<FakeTransport>,
    sink: Arc<InMemoryLifecycleSink>,
) -> AnalysisOrchestrator {
    AnalysisOrchestrator::builder()
        .endpoint(FAKE_ENDPOINT)
        .transport(transport)
        .sink(sink)
        .build()
        .expect("failed to build orchestrator")
}
