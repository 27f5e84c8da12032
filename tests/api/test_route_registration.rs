// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Router-level tests: route registration and body rejection handling
//!
//! Exercises the built router through tower, where axum's own JSON
//! extraction runs, to pin the 400 behavior for bodies that never reach
//! the handler's validation.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use fabstir_rx_node::api::build_router;
use fabstir_rx_node::api::http_server::AppState;
use fabstir_rx_node::config::NodeConfig;
use fabstir_rx_node::extraction::{CompletionClient, ExtractionError};
use fabstir_rx_node::storage::ArtifactStore;
use fabstir_rx_node::vision::{Detection, OcrError, TextDetector};
use tempfile::TempDir;
use tower::ServiceExt;

struct NullDetector;

#[async_trait]
impl TextDetector for NullDetector {
    async fn detect(&self, _image_bytes: &[u8]) -> Result<Vec<Detection>, OcrError> {
        Ok(Vec::new())
    }
}

struct NullLlm;

#[async_trait]
impl CompletionClient for NullLlm {
    async fn complete(
        &self,
        _prompt: &str,
        _temperature: f32,
    ) -> Result<String, ExtractionError> {
        Ok(r#"{"medications": []}"#.to_string())
    }
}

fn test_router() -> (axum::Router, TempDir) {
    let tmp = TempDir::new().unwrap();
    let config = NodeConfig {
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
    };

    let state = AppState::new(
        Arc::new(NullDetector),
        Arc::new(NullLlm),
        Arc::new(ArtifactStore::new(
            config.image_dir.clone(),
            config.transcript_dir.clone(),
        )),
        Arc::new(config),
    );

    (build_router(state), tmp)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_route() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_invalid_json_body_is_400() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/receive-data")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("this is not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Request body must be valid JSON");
}

#[tokio::test]
async fn test_missing_keys_over_http_is_400() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/receive-data")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"id": "rx-1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing 'id' or 'String' key");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _tmp) = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
