//! Integration tests for the Gemini responder fallback behavior.
//!
//! These tests point the responder at a stub HTTP backend that speaks just
//! enough of the generateContent wire format to script per-model outcomes:
//! which model answers, which rejects, which times out, and what text comes
//! back.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use gembot_responder::{
    CallFailure, GeminiResponder, GenerateError, Responder, ResponderConfig,
};

/// Primary model name used by every test.
const PRIMARY: &str = "gemini-1.5-flash-latest";

/// Fallback model name used by every test.
const FALLBACK: &str = "gemini-1.5-pro";

// ============================================================================
// Stub Backend
// ============================================================================

/// Scripted outcome for one model.
#[derive(Clone)]
enum StubReply {
    /// 200 with one candidate carrying this text.
    Text(&'static str),
    /// Non-success status with a Gemini-style error body.
    Status(u16),
    /// 200 with zero candidates.
    NoCandidates,
    /// Delay before answering with this text.
    Slow(u64, &'static str),
}

/// Shared state of the stub backend: scripted replies and the models hit.
#[derive(Clone)]
struct StubBackend {
    primary: StubReply,
    fallback: StubReply,
    hits: Arc<Mutex<Vec<String>>>,
}

impl StubBackend {
    fn new(primary: StubReply, fallback: StubReply) -> Self {
        Self {
            primary,
            fallback,
            hits: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn hits(&self) -> Vec<String> {
        self.hits.lock().expect("hits lock poisoned").clone()
    }
}

/// Handler for `POST /v1beta/models/{model}:generateContent`.
async fn generate_handler(
    Path(action): Path<String>,
    State(stub): State<StubBackend>,
) -> Response {
    let model = action
        .strip_suffix(":generateContent")
        .unwrap_or(&action)
        .to_string();

    stub.hits
        .lock()
        .expect("hits lock poisoned")
        .push(model.clone());

    let reply = if model == PRIMARY {
        stub.primary.clone()
    } else {
        stub.fallback.clone()
    };

    match reply {
        StubReply::Text(text) => candidate_response(text),
        StubReply::Status(status) => (
            StatusCode::from_u16(status).expect("invalid stub status"),
            Json(serde_json::json!({"error": {"message": "stub failure"}})),
        )
            .into_response(),
        StubReply::NoCandidates => Json(serde_json::json!({"candidates": []})).into_response(),
        StubReply::Slow(ms, text) => {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            candidate_response(text)
        }
    }
}

/// Builds a well-formed generateContent response with one text candidate.
fn candidate_response(text: &str) -> Response {
    Json(serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": text}]
            },
            "finishReason": "STOP"
        }]
    }))
    .into_response()
}

/// Spawns the stub backend and returns its base URL.
async fn spawn_stub_backend(stub: StubBackend) -> (String, tokio::task::JoinHandle<()>) {
    let router = Router::new()
        .route("/v1beta/models/:action", post(generate_handler))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let base_url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Stub failed");
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    (base_url, handle)
}

/// Builds a responder against the stub with a short per-call timeout.
fn responder_for(base_url: &str) -> GeminiResponder {
    let config = ResponderConfig {
        primary_model: PRIMARY.to_string(),
        fallback_model: FALLBACK.to_string(),
        request_timeout: Duration::from_millis(500),
    };
    GeminiResponder::with_base_url("test-key", base_url, config)
        .expect("Failed to build responder")
}

// ============================================================================
// Fallback Tests
// ============================================================================

/// Primary succeeds: one call, no fallback.
#[tokio::test]
async fn test_primary_success_skips_fallback() {
    let stub = StubBackend::new(StubReply::Text("Hello"), StubReply::Text("wrong tier"));
    let (base_url, _handle) = spawn_stub_backend(stub.clone()).await;

    let reply = responder_for(&base_url).generate("hi").await.expect("generate failed");

    assert_eq!(reply, "Hello");
    assert_eq!(stub.hits(), vec![PRIMARY.to_string()]);
}

/// Primary rejected, fallback answers: the caller sees only the fallback
/// reply, sanitized.
#[tokio::test]
async fn test_fallback_after_primary_rejection() {
    let stub = StubBackend::new(StubReply::Status(500), StubReply::Text("Hello"));
    let (base_url, _handle) = spawn_stub_backend(stub.clone()).await;

    let reply = responder_for(&base_url).generate("hi").await.expect("generate failed");

    assert_eq!(reply, "Hello");
    assert_eq!(stub.hits(), vec![PRIMARY.to_string(), FALLBACK.to_string()]);
}

/// An empty candidate list counts as a primary failure and triggers the
/// fallback, not an error.
#[tokio::test]
async fn test_fallback_after_empty_candidates() {
    let stub = StubBackend::new(StubReply::NoCandidates, StubReply::Text("from fallback"));
    let (base_url, _handle) = spawn_stub_backend(stub.clone()).await;

    let reply = responder_for(&base_url).generate("hi").await.expect("generate failed");

    assert_eq!(reply, "from fallback");
    assert_eq!(stub.hits().len(), 2);
}

/// A primary call slower than the timeout budget falls back; the fallback
/// gets a fresh window.
#[tokio::test]
async fn test_fallback_after_primary_timeout() {
    let stub = StubBackend::new(StubReply::Slow(2_000, "too late"), StubReply::Text("in time"));
    let (base_url, _handle) = spawn_stub_backend(stub.clone()).await;

    let reply = responder_for(&base_url).generate("hi").await.expect("generate failed");

    assert_eq!(reply, "in time");
}

// ============================================================================
// Failure Taxonomy Tests
// ============================================================================

/// Both tiers rejected: the error names both causes.
#[tokio::test]
async fn test_both_tiers_failing_reports_both_causes() {
    let stub = StubBackend::new(StubReply::Status(500), StubReply::Status(503));
    let (base_url, _handle) = spawn_stub_backend(stub.clone()).await;

    let err = responder_for(&base_url)
        .generate("hi")
        .await
        .expect_err("generate should fail");

    match err {
        GenerateError::BackendCall { primary, fallback } => {
            assert!(matches!(primary, CallFailure::Api { status: 500, .. }));
            assert!(matches!(fallback, CallFailure::Api { status: 503, .. }));
        }
        other => panic!("Expected BackendCall error, got: {other:?}"),
    }
    assert_eq!(stub.hits().len(), 2);
}

/// A reply that sanitizes down to nothing is an empty-response error, not a
/// blank success.
#[tokio::test]
async fn test_reply_sanitized_to_empty_is_error() {
    let stub = StubBackend::new(StubReply::Text("{[model]}&"), StubReply::Text("unused"));
    let (base_url, _handle) = spawn_stub_backend(stub.clone()).await;

    let err = responder_for(&base_url)
        .generate("hi")
        .await
        .expect_err("generate should fail");

    assert!(matches!(err, GenerateError::EmptyResponse));
    // The call itself succeeded, so no fallback was attempted
    assert_eq!(stub.hits(), vec![PRIMARY.to_string()]);
}

// ============================================================================
// Sanitation Tests (end to end)
// ============================================================================

/// Backend formatting artifacts are stripped before the reply reaches the
/// caller.
#[tokio::test]
async fn test_reply_is_sanitized() {
    let stub = StubBackend::new(
        StubReply::Text("&{content:Hello model World}"),
        StubReply::Text("unused"),
    );
    let (base_url, _handle) = spawn_stub_backend(stub).await;

    let reply = responder_for(&base_url).generate("hi").await.expect("generate failed");

    assert_eq!(reply, "content:Hello  World");
}

/// Plain replies pass through untouched apart from trimming.
#[tokio::test]
async fn test_plain_reply_passes_through() {
    let stub = StubBackend::new(StubReply::Text("  A plain answer.  "), StubReply::Text("x"));
    let (base_url, _handle) = spawn_stub_backend(stub).await;

    let reply = responder_for(&base_url).generate("hi").await.expect("generate failed");

    assert_eq!(reply, "A plain answer.");
}
