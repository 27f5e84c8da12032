// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server: router, shared state, serve loop

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::receive_data::receive_data_handler;
use crate::config::NodeConfig;
use crate::extraction::CompletionClient;
use crate::storage::ArtifactStore;
use crate::vision::TextDetector;

/// Shared per-process state, built once at startup
///
/// Collaborators live behind Arc'd trait objects: requests run the pipeline
/// against the same OCR client and LLM client, never constructing their own.
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<dyn TextDetector>,
    pub llm: Arc<dyn CompletionClient>,
    pub store: Arc<ArtifactStore>,
    pub config: Arc<NodeConfig>,
}

impl AppState {
    pub fn new(
        detector: Arc<dyn TextDetector>,
        llm: Arc<dyn CompletionClient>,
        store: Arc<ArtifactStore>,
        config: Arc<NodeConfig>,
    ) -> Self {
        Self {
            detector,
            llm,
            store,
            config,
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/receive-data", post(receive_data_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
