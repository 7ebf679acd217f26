//! End-to-end tests over real HTTP against a mockito analysis service.

mod common;

use common::{full_response, MockServerFixture, HOOK_PATH};
use idea_analyzer::lifecycle::InMemoryLifecycleSink;
use idea_analyzer::transport::HttpTransport;
use idea_analyzer::{
    AnalysisOrchestrator, AnalysisOutcome, CanonicalField, ErrorKind, RequestPhase, VerdictTone,
};
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn sink() -> Arc<InMemoryLifecycleSink> {
    Arc::new(InMemoryLifecycleSink::new(256))
}

#[tokio::test]
async fn scenario_a_secondary_aliases_complete() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", HOOK_PATH)
        .match_header("content-type", "application/json")
        .match_header("accept", "application/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "idea": "A meal planning app" })),
            Matcher::Regex(r#""timestamp":"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z""#.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "summary": "Plans meals.",
                "market_potential": "Large.",
                "risks": "Crowded market.",
                "suggestions": "Partner with grocers.",
                "verdict": "Promising",
                "validation": "Landing page test.",
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let events = sink();
    let orchestrator = fixture.orchestrator(events.clone());

    let outcome = orchestrator
        .submit("  A meal planning app  ")
        .await
        .expect("submission accepted");

    mock.assert_async().await;
    let analysis = outcome.into_result().expect("analysis should complete");
    assert_eq!(analysis.summary(), "Plans meals.");
    assert_eq!(analysis.market_potential(), "Large.");
    assert_eq!(analysis.key_risks(), "Crowded market.");
    assert_eq!(analysis.suggestions(), "Partner with grocers.");
    assert_eq!(analysis.final_verdict(), "Promising");
    assert_eq!(analysis.validation_strategy(), "Landing page test.");
    assert_eq!(analysis.verdict_tone(), VerdictTone::Promising);

    assert_eq!(
        events.phases(),
        vec![
            RequestPhase::Validating,
            RequestPhase::Sending,
            RequestPhase::Normalizing,
            RequestPhase::Complete,
            RequestPhase::Idle,
        ]
    );
    assert_eq!(events.busy_transitions(), vec![true, false]);
    assert_eq!(events.outcomes(), 1);
    assert_eq!(orchestrator.phase(), RequestPhase::Idle);
}

#[tokio::test]
async fn scenario_b_empty_input_never_reaches_network() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", HOOK_PATH)
        .expect(0)
        .create_async()
        .await;

    let events = sink();
    let orchestrator = fixture.orchestrator(events.clone());
    let err = orchestrator
        .submit("")
        .await
        .unwrap()
        .into_result()
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.kind, ErrorKind::ValidationError);
    assert!(!err.retryable);
    assert!(err.message.contains("describe"));
    assert_eq!(
        events.phases(),
        vec![
            RequestPhase::Validating,
            RequestPhase::Classifying,
            RequestPhase::Failed,
            RequestPhase::Idle,
        ]
    );
}

#[tokio::test]
async fn too_long_input_never_reaches_network() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", HOOK_PATH)
        .expect(0)
        .create_async()
        .await;

    let orchestrator = fixture.orchestrator(sink());
    let err = orchestrator
        .submit(&"x".repeat(5001))
        .await
        .unwrap()
        .into_result()
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.kind, ErrorKind::ValidationError);
    assert!(err.message.contains("5000"));
}

#[tokio::test]
async fn scenario_c_rate_limited() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .server
        .mock("POST", HOOK_PATH)
        .with_status(429)
        .with_header("retry-after", "7")
        .with_body("slow down")
        .create_async()
        .await;

    let orchestrator = fixture.orchestrator(sink());
    let err = orchestrator
        .submit("A meal planning app")
        .await
        .unwrap()
        .into_result()
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::RateLimited);
    assert!(err.retryable);
    assert_eq!(err.status, Some(429));
    assert_eq!(err.retry_after, Some(Duration::from_secs(7)));
    assert!(!err.message.contains("slow down"));
}

#[tokio::test]
async fn scenario_d_incomplete_response_lists_all_missing() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json_response(200, &json!({ "summary": "x" })).await;

    let events = sink();
    let orchestrator = fixture.orchestrator(events.clone());
    let err = orchestrator
        .submit("A meal planning app")
        .await
        .unwrap()
        .into_result()
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::IncompleteResponseError);
    assert!(!err.retryable);
    assert_eq!(
        err.missing,
        vec![
            CanonicalField::MarketPotential,
            CanonicalField::KeyRisks,
            CanonicalField::Suggestions,
            CanonicalField::FinalVerdict,
            CanonicalField::ValidationStrategy,
        ]
    );
    assert_eq!(
        events.phases(),
        vec![
            RequestPhase::Validating,
            RequestPhase::Sending,
            RequestPhase::Normalizing,
            RequestPhase::Classifying,
            RequestPhase::Failed,
            RequestPhase::Idle,
        ]
    );
}

#[tokio::test]
async fn server_errors_are_service_unavailable() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(503, &json!({ "error": "maintenance" }))
        .await;

    let err = fixture
        .orchestrator(sink())
        .submit("idea")
        .await
        .unwrap()
        .into_result()
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    assert!(err.retryable);
    assert_eq!(err.status, Some(503));
}

#[tokio::test]
async fn client_errors_are_protocol_errors() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(404, &json!({ "message": "webhook not registered" }))
        .await;

    let err = fixture
        .orchestrator(sink())
        .submit("idea")
        .await
        .unwrap()
        .into_result()
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::ProtocolError);
    assert!(!err.retryable);
    assert_eq!(err.status, Some(404));
    assert!(err.diagnostic.unwrap().contains("webhook not registered"));
}

#[tokio::test]
async fn non_json_content_type_is_protocol_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_raw_response(200, "text/html", "<html>ok</html>")
        .await;

    let err = fixture
        .orchestrator(sink())
        .submit("idea")
        .await
        .unwrap()
        .into_result()
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::ProtocolError);
    assert_eq!(err.status, None);
}

#[tokio::test]
async fn malformed_and_non_object_bodies_are_protocol_errors() {
    for body in ["{\"summary\": ", "[1, 2, 3]", "\"just a string\""] {
        let mut fixture = MockServerFixture::new().await;
        let _mock = fixture
            .mock_raw_response(200, "application/json", body)
            .await;

        let err = fixture
            .orchestrator(sink())
            .submit("idea")
            .await
            .unwrap()
            .into_result()
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::ProtocolError, "body: {body}");
    }
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    // Bind then release a port so nothing is listening on it.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let events = sink();
    let orchestrator = AnalysisOrchestrator::builder()
        .endpoint(format!("http://{}{}", addr, HOOK_PATH))
        .sink(events.clone())
        .build()
        .unwrap();

    let err = orchestrator
        .submit("idea")
        .await
        .unwrap()
        .into_result()
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::TransportError);
    assert!(err.retryable);
    assert_eq!(events.outcomes(), 1);
}

#[tokio::test]
async fn missing_endpoint_is_configuration_error_without_network() {
    let events = sink();
    let orchestrator = AnalysisOrchestrator::builder()
        .sink(events.clone())
        .build()
        .unwrap();

    let outcome = orchestrator.submit("A meal planning app").await.unwrap();
    let err = outcome.error().unwrap();
    assert_eq!(err.kind, ErrorKind::ConfigurationError);
    assert!(!err.retryable);
    assert!(!events.phases().contains(&RequestPhase::Sending));
}

#[tokio::test]
async fn configuration_takes_precedence_over_validation() {
    let orchestrator = AnalysisOrchestrator::builder()
        .endpoint("https://your-n8n-instance.com/webhook/startup-evaluator")
        .build()
        .unwrap();

    let outcome = orchestrator.submit("   ").await.unwrap();
    assert!(matches!(
        outcome,
        AnalysisOutcome::Failed(ref e) if e.kind == ErrorKind::ConfigurationError
    ));
}

#[tokio::test]
async fn full_primary_keys_round_out_the_record() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json_response(201, &full_response()).await;

    let analysis = fixture
        .orchestrator(sink())
        .submit("A meal planning app")
        .await
        .unwrap()
        .into_result()
        .unwrap();

    let json = serde_json::to_value(&analysis).unwrap();
    for field in CanonicalField::ALL {
        assert!(json[field.name()].as_str().is_some_and(|s| !s.is_empty()));
    }
}

#[tokio::test]
async fn caller_supplied_client_is_used() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", HOOK_PATH)
        .match_header("user-agent", "custom-agent/1.0")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(full_response().to_string())
        .expect(1)
        .create_async()
        .await;

    let client = reqwest::Client::builder()
        .user_agent("custom-agent/1.0")
        .build()
        .unwrap();
    let orchestrator = AnalysisOrchestrator::builder()
        .endpoint(fixture.endpoint.clone())
        .transport(Arc::new(HttpTransport::with_client(client)))
        .build()
        .unwrap();

    let outcome = orchestrator.submit("A meal planning app").await.unwrap();
    mock.assert_async().await;
    assert_eq!(
        outcome.analysis().map(|a| a.final_verdict()),
        Some("Promising")
    );
}
