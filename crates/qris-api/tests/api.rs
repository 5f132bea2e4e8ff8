//! End-to-end tests of the HTTP surface against an in-memory processor.

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use image::DynamicImage;
use qris_api::auth::FORBIDDEN_MESSAGE;
use qris_api::handlers::{QrisResponse, PNG_DATA_URI_PREFIX};
use qris_api::{create_router, AppConfig, AppState};
use qris_core::{GeneratedQr, PaymentCheck, QrisError, QrisProcessor, QrisResult};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const API_KEY: &str = "test-internal-key";

/// What the fake collaborator does when called
#[derive(Clone)]
enum Outcome {
    Image,
    NoImage,
    Status(Value),
    Fail(&'static str),
}

struct FakeProcessor {
    outcome: Outcome,
    calls: AtomicUsize,
    last_args: Mutex<Option<(String, i64)>>,
}

impl FakeProcessor {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_args: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QrisProcessor for FakeProcessor {
    async fn generate(&self, amount: i64) -> QrisResult<GeneratedQr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_args.lock().unwrap() = Some((String::new(), amount));

        match &self.outcome {
            Outcome::Image => Ok(GeneratedQr::new("000201", DynamicImage::new_luma8(21, 21))),
            Outcome::NoImage => Ok(GeneratedQr::empty("000201")),
            Outcome::Fail(message) => Err(QrisError::Network(message.to_string())),
            Outcome::Status(_) => Err(QrisError::Internal("unexpected generate".to_string())),
        }
    }

    async fn check_payment(&self, order_ref: &str, amount: i64) -> QrisResult<PaymentCheck> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_args.lock().unwrap() = Some((order_ref.to_string(), amount));

        match &self.outcome {
            Outcome::Status(value) => PaymentCheck::from_value(value.clone()),
            Outcome::Fail(message) => Err(QrisError::Network(message.to_string())),
            _ => Err(QrisError::Internal("unexpected check_payment".to_string())),
        }
    }

    fn processor_name(&self) -> &'static str {
        "fake"
    }
}

fn server_with(config: AppConfig, processor: Arc<FakeProcessor>) -> TestServer {
    let state = AppState::with_processor(config, processor);
    TestServer::new(create_router(state)).unwrap()
}

fn server(processor: Arc<FakeProcessor>) -> TestServer {
    server_with(AppConfig::with_api_key(API_KEY), processor)
}

fn api_key_header() -> HeaderName {
    HeaderName::from_static("x-api-key")
}

async fn post_with_key(server: &TestServer, path: &str, key: &'static str, body: Value) -> TestResponse {
    server
        .post(path)
        .add_header(api_key_header(), HeaderValue::from_static(key))
        .json(&body)
        .await
}

fn order_body() -> Value {
    json!({"amount": 10000, "order_ref": "ORD-1"})
}

// =============================================================================
// Liveness
// =============================================================================

#[tokio::test]
async fn root_is_public() {
    let server = server(FakeProcessor::new(Outcome::Image));

    let response = server.get("/").await;

    response.assert_status_ok();
    response.assert_json(&json!({"message": "MinerX QRIS Service is running"}));
}

#[tokio::test]
async fn health_reports_processor() {
    let server = server(FakeProcessor::new(Outcome::Image));

    let body: Value = server.get("/health").await.json();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["processor"], "fake");
}

// =============================================================================
// Authentication gate
// =============================================================================

#[tokio::test]
async fn create_qris_with_wrong_key_is_forbidden() {
    let processor = FakeProcessor::new(Outcome::Image);
    let server = server(processor.clone());

    let response = post_with_key(&server, "/create-qris", "wrong", order_body()).await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["detail"], FORBIDDEN_MESSAGE);
    assert_eq!(processor.calls(), 0);
}

#[tokio::test]
async fn check_payment_with_wrong_key_is_forbidden() {
    let processor = FakeProcessor::new(Outcome::Status(json!({"success": true})));
    let server = server(processor.clone());

    let response = post_with_key(&server, "/check-payment", "wrong", order_body()).await;

    response.assert_status(StatusCode::FORBIDDEN);
    response.assert_json(&json!({"detail": FORBIDDEN_MESSAGE}));
    assert_eq!(processor.calls(), 0);
}

#[tokio::test]
async fn processor_failure_body_has_only_detail() {
    let server = server(FakeProcessor::new(Outcome::Fail("boom")));

    let response = post_with_key(&server, "/create-qris", API_KEY, order_body()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({"detail": "Error generating QR: Network error: boom"}));
}

#[tokio::test]
async fn protected_routes_without_key_are_forbidden() {
    let processor = FakeProcessor::new(Outcome::Status(json!({"success": true})));
    let server = server(processor.clone());

    for path in ["/create-qris", "/check-payment"] {
        let response = server.post(path).json(&order_body()).await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    assert_eq!(processor.calls(), 0);
}

#[tokio::test]
async fn gate_runs_before_body_parsing() {
    let processor = FakeProcessor::new(Outcome::Image);
    let server = server(processor.clone());

    let response = post_with_key(&server, "/create-qris", "wrong", json!({"amount": "lots"})).await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(processor.calls(), 0);
}

#[tokio::test]
async fn missing_secret_locks_out_everyone() {
    let processor = FakeProcessor::new(Outcome::Image);
    let mut config = AppConfig::with_api_key(API_KEY);
    config.internal_api_key = None;
    let server = server_with(config, processor.clone());

    let response = post_with_key(&server, "/create-qris", API_KEY, order_body()).await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(processor.calls(), 0);
}

// =============================================================================
// Generate QR
// =============================================================================

#[tokio::test]
async fn create_qris_returns_data_uri_and_echoes_order() {
    let processor = FakeProcessor::new(Outcome::Image);
    let server = server(processor.clone());

    let response = post_with_key(&server, "/create-qris", API_KEY, order_body()).await;

    response.assert_status_ok();
    let body: QrisResponse = response.json();
    assert_eq!(body.order_ref, "ORD-1");
    assert_eq!(body.amount, 10000);
    assert!(body.qr_image_base64.starts_with(PNG_DATA_URI_PREFIX));
    assert!(body.qr_image_base64.len() > PNG_DATA_URI_PREFIX.len());

    assert_eq!(processor.calls(), 1);
    assert_eq!(*processor.last_args.lock().unwrap(), Some((String::new(), 10000)));
}

#[tokio::test]
async fn create_qris_echoes_unusual_references_verbatim() {
    let server = server(FakeProcessor::new(Outcome::Image));
    let body = json!({"amount": -5, "order_ref": "  ORD/ü 1  "});

    let response = post_with_key(&server, "/create-qris", API_KEY, body).await;

    response.assert_status_ok();
    let body: QrisResponse = response.json();
    assert_eq!(body.order_ref, "  ORD/ü 1  ");
    assert_eq!(body.amount, -5);
}

#[tokio::test]
async fn create_qris_without_image_fails() {
    let server = server(FakeProcessor::new(Outcome::NoImage));

    let response = post_with_key(&server, "/create-qris", API_KEY, order_body()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().contains("QR generation failed"));
}

#[tokio::test]
async fn create_qris_processor_failure_embeds_message() {
    let server = server(FakeProcessor::new(Outcome::Fail("upstream exploded")));

    let response = post_with_key(&server, "/create-qris", API_KEY, order_body()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().contains("upstream exploded"));
}

#[tokio::test]
async fn create_qris_rejects_malformed_body() {
    let processor = FakeProcessor::new(Outcome::Image);
    let server = server(processor.clone());

    let response = post_with_key(&server, "/create-qris", API_KEY, json!({"amount": 10000})).await;

    assert!(response.status_code().is_client_error());
    assert_eq!(processor.calls(), 0);
}

// =============================================================================
// Check payment
// =============================================================================

async fn status_for(collaborator: Value) -> Value {
    let server = server(FakeProcessor::new(Outcome::Status(collaborator)));
    let response = post_with_key(&server, "/check-payment", API_KEY, order_body()).await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn check_payment_paid() {
    let body = status_for(json!({"success": true, "data": {"status": "PAID"}})).await;
    assert_eq!(body, json!({"status": "PAID"}));
}

#[tokio::test]
async fn check_payment_expired_is_pending() {
    let body = status_for(json!({"success": true, "data": {"status": "EXPIRED"}})).await;
    assert_eq!(body, json!({"status": "PENDING"}));
}

#[tokio::test]
async fn check_payment_unsuccessful_or_empty_is_pending() {
    for collaborator in [
        json!({"success": false, "data": {"status": "PAID"}}),
        json!({"success": true}),
        json!({"success": true, "data": {}}),
    ] {
        let body = status_for(collaborator).await;
        assert_eq!(body, json!({"status": "PENDING"}));
    }
}

#[tokio::test]
async fn check_payment_forwards_reference_and_amount() {
    let processor = FakeProcessor::new(Outcome::Status(json!({"success": false})));
    let server = server(processor.clone());

    post_with_key(
        &server,
        "/check-payment",
        API_KEY,
        json!({"order_ref": "ORD-77", "amount": 25000}),
    )
    .await
    .assert_status_ok();

    assert_eq!(
        *processor.last_args.lock().unwrap(),
        Some(("ORD-77".to_string(), 25000))
    );
}

#[tokio::test]
async fn check_payment_is_repeatable() {
    let processor = FakeProcessor::new(Outcome::Status(json!({"success": true, "data": {"status": "PAID"}})));
    let server = server(processor.clone());

    for _ in 0..3 {
        let response = post_with_key(&server, "/check-payment", API_KEY, order_body()).await;
        response.assert_json(&json!({"status": "PAID"}));
    }

    assert_eq!(processor.calls(), 3);
}

#[tokio::test]
async fn check_payment_processor_failure_embeds_message() {
    let server = server(FakeProcessor::new(Outcome::Fail("status lookup timed out")));

    let response = post_with_key(&server, "/check-payment", API_KEY, order_body()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().contains("status lookup timed out"));
}

#[tokio::test]
async fn check_payment_schema_drift_fails_loudly() {
    let server = server(FakeProcessor::new(Outcome::Status(json!({"data": {"status": "PAID"}}))));

    let response = post_with_key(&server, "/check-payment", API_KEY, order_body()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().contains("Malformed processor response"));
}
