// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Endpoint tests for POST /receive-data
//!
//! These tests verify that receive_data_handler correctly:
//! - Validates request bodies and returns 400 with the expected messages
//! - Runs the full pipeline (decode -> OCR -> group -> clean -> extract)
//! - Persists the image and transcript artifacts keyed by id
//! - Collapses every pipeline failure into a single 500
//! - Skips the LLM call entirely when OCR yields no usable text

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use fabstir_rx_node::api::http_server::AppState;
use fabstir_rx_node::api::receive_data::{
    receive_data_handler, ReceiveDataRequest,
};
use fabstir_rx_node::config::NodeConfig;
use fabstir_rx_node::extraction::{CompletionClient, ExtractionError};
use fabstir_rx_node::storage::ArtifactStore;
use fabstir_rx_node::vision::{Detection, OcrError, TextDetector};
use tempfile::TempDir;

// 1x1 red PNG image (base64)
const TINY_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

/// Scripted detector: returns a fixed detection set or a fixed error
struct FakeDetector {
    detections: Result<Vec<Detection>, String>,
}

#[async_trait]
impl TextDetector for FakeDetector {
    async fn detect(&self, _image_bytes: &[u8]) -> Result<Vec<Detection>, OcrError> {
        self.detections
            .clone()
            .map_err(OcrError::Service)
    }
}

/// Scripted LLM: returns a fixed reply and counts invocations
struct FakeLlm {
    reply: Result<String, String>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl CompletionClient for FakeLlm {
    async fn complete(
        &self,
        _prompt: &str,
        _temperature: f32,
    ) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(ExtractionError::Service)
    }
}

struct TestHarness {
    state: AppState,
    llm_calls: Arc<AtomicUsize>,
    _tmp: TempDir,
}

fn test_config(tmp: &TempDir) -> NodeConfig {
    NodeConfig {
        api_port: 0,
        groq_api_key: "test-key".to_string(),
        groq_model: "openai/gpt-oss-120b".to_string(),
        groq_endpoint: "http://localhost:0".to_string(),
        ocr_endpoint: "http://localhost:0".to_string(),
        image_dir: tmp.path().join("images"),
        transcript_dir: tmp.path().join("transcripts"),
        y_threshold: 15.0,
        ocr_timeout_secs: 1,
        llm_timeout_secs: 1,
    }
}

fn setup(detections: Result<Vec<Detection>, String>, reply: Result<String, String>) -> TestHarness {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    let llm_calls = Arc::new(AtomicUsize::new(0));

    let state = AppState::new(
        Arc::new(FakeDetector { detections }),
        Arc::new(FakeLlm {
            reply,
            calls: llm_calls.clone(),
        }),
        Arc::new(ArtifactStore::new(
            config.image_dir.clone(),
            config.transcript_dir.clone(),
        )),
        Arc::new(config),
    );

    TestHarness {
        state,
        llm_calls,
        _tmp: tmp,
    }
}

fn request(id: &str, payload: &str) -> ReceiveDataRequest {
    serde_json::from_value(serde_json::json!({ "id": id, "String": payload })).unwrap()
}

/// A 20x10 word box whose y-center is `y` and leftmost x is `x`
fn det(x: f32, y: f32, text: &str) -> Detection {
    Detection::new(
        vec![
            [x, y - 5.0],
            [x + 20.0, y - 5.0],
            [x + 20.0, y + 5.0],
            [x, y + 5.0],
        ],
        text,
        0.9,
    )
}

#[tokio::test]
async fn test_full_pipeline_success() {
    let detections = vec![
        det(40.0, 100.0, "P a r a c e t a m o |"),
        det(0.0, 102.0, "Tab"),
        det(0.0, 200.0, "www.shutterstock.com"),
        det(0.0, 300.0, "Inj Ceftriaxone"),
    ];
    let reply = r#"{"medications": ["Paracetamol", "paracetamol", "Ceftriaxone"]}"#;
    let harness = setup(Ok(detections), Ok(reply.to_string()));

    let result = receive_data_handler(
        State(harness.state),
        Ok(Json(request("rx-7", TINY_PNG_BASE64))),
    )
    .await;

    let Json(response) = result.expect("pipeline should succeed");
    assert_eq!(response.message, "Data processed successfully");

    // Grouping put "Tab" before the spaced-out word; cleanup rejoined it
    // and dropped the watermark line.
    assert_eq!(response.text, "Tab Paracetamol\nInj Ceftriaxone");

    // Case-insensitive dedup, first-seen casing.
    assert_eq!(
        response.medications,
        vec!["Paracetamol".to_string(), "Ceftriaxone".to_string()]
    );

    // Artifacts exist where the response says they are.
    assert!(PathBuf::from(&response.image_path).exists());
    assert!(response.image_path.ends_with("rx-7.png"));
    assert!(PathBuf::from(&response.docx_path).exists());
    assert!(response.docx_path.ends_with("rx-7.txt"));

    assert_eq!(harness.llm_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_data_uri_payload_accepted() {
    let harness = setup(
        Ok(vec![det(0.0, 10.0, "Dolo 650")]),
        Ok(r#"{"medications": ["Dolo"]}"#.to_string()),
    );
    let payload = format!("data:image/png;base64,{}", TINY_PNG_BASE64);

    let result = receive_data_handler(
        State(harness.state),
        Ok(Json(request("rx-8", &payload))),
    )
    .await;

    let Json(response) = result.expect("data-URI payload should decode");
    assert_eq!(response.medications, vec!["Dolo".to_string()]);

    // The saved image must be the decoded bytes, not the base64 text.
    let saved = std::fs::read(&response.image_path).unwrap();
    assert_eq!(saved, STANDARD.decode(TINY_PNG_BASE64).unwrap());
}

#[tokio::test]
async fn test_missing_keys_is_400() {
    let harness = setup(Ok(vec![]), Ok(String::new()));

    let body: ReceiveDataRequest = serde_json::from_str("{}").unwrap();
    let err = receive_data_handler(State(harness.state), Ok(Json(body)))
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert!(err.message().contains("Missing 'id' or 'String' key"));
}

#[tokio::test]
async fn test_non_string_fields_are_400() {
    let harness = setup(Ok(vec![]), Ok(String::new()));

    let body: ReceiveDataRequest =
        serde_json::from_value(serde_json::json!({ "id": 12, "String": "aGVsbG8=" })).unwrap();
    let err = receive_data_handler(State(harness.state.clone()), Ok(Json(body)))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.message(), "id must be string");

    let body: ReceiveDataRequest =
        serde_json::from_value(serde_json::json!({ "id": "rx-1", "String": false })).unwrap();
    let err = receive_data_handler(State(harness.state), Ok(Json(body)))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.message(), "String must be text");
}

#[tokio::test]
async fn test_invalid_base64_is_processing_failure() {
    let harness = setup(Ok(vec![]), Ok(String::new()));

    let err = receive_data_handler(
        State(harness.state),
        Ok(Json(request("rx-9", "!!!not-base64!!!"))),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.message().starts_with("Processing failed:"));
    assert_eq!(harness.llm_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_ocr_failure_is_processing_failure() {
    let harness = setup(Err("detector crashed".to_string()), Ok(String::new()));

    let err = receive_data_handler(
        State(harness.state),
        Ok(Json(request("rx-10", TINY_PNG_BASE64))),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.message().contains("detector crashed"));
    assert_eq!(harness.llm_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_llm_failure_is_processing_failure() {
    let harness = setup(
        Ok(vec![det(0.0, 10.0, "Tab Dolo")]),
        Err("service unavailable".to_string()),
    );

    let err = receive_data_handler(
        State(harness.state),
        Ok(Json(request("rx-11", TINY_PNG_BASE64))),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.message().contains("service unavailable"));
}

#[tokio::test]
async fn test_no_text_skips_llm_call() {
    // OCR found nothing: the transcript is empty, so the extraction stage
    // must return an empty list without touching the service.
    let harness = setup(Ok(vec![]), Ok(r#"{"medications": ["ghost"]}"#.to_string()));

    let result = receive_data_handler(
        State(harness.state),
        Ok(Json(request("rx-12", TINY_PNG_BASE64))),
    )
    .await;

    let Json(response) = result.expect("empty OCR output is not an error");
    assert_eq!(response.text, "");
    assert!(response.medications.is_empty());
    assert_eq!(harness.llm_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_watermark_only_document_skips_llm_call() {
    let harness = setup(
        Ok(vec![det(0.0, 10.0, "shutterstock sample")]),
        Ok(r#"{"medications": ["ghost"]}"#.to_string()),
    );

    let result = receive_data_handler(
        State(harness.state),
        Ok(Json(request("rx-13", TINY_PNG_BASE64))),
    )
    .await;

    let Json(response) = result.expect("watermark-only output is not an error");
    assert_eq!(response.text, "");
    assert!(response.medications.is_empty());
    assert_eq!(harness.llm_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_freeform_reply_still_succeeds() {
    let harness = setup(
        Ok(vec![det(0.0, 10.0, "Tab Cetirizine")]),
        Ok("- Cetirizine\n- Cetirizine".to_string()),
    );

    let result = receive_data_handler(
        State(harness.state),
        Ok(Json(request("rx-14", TINY_PNG_BASE64))),
    )
    .await;

    let Json(response) = result.expect("malformed model output must not fail");
    assert_eq!(response.medications, vec!["Cetirizine".to_string()]);
}

// Sidecar/LLM client constructors are exercised here so a bad default
// configuration fails a test rather than the first request.
#[tokio::test]
async fn test_production_collaborators_construct() {
    use fabstir_rx_node::extraction::GroqClient;
    use fabstir_rx_node::vision::SidecarOcrClient;

    assert!(SidecarOcrClient::new("http://127.0.0.1:9001", Duration::from_secs(30)).is_ok());
    assert!(GroqClient::new(
        "https://api.groq.com/openai/v1",
        "key",
        "openai/gpt-oss-120b",
        Duration::from_secs(60),
    )
    .is_ok());
}
