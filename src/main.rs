// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use fabstir_rx_node::{
    api::{start_server, AppState},
    config::NodeConfig,
    extraction::GroqClient,
    storage::ArtifactStore,
    vision::SidecarOcrClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    // .env first, so RUST_LOG and GROQ_* from the file take effect
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    tracing::info!("Starting Fabstir Rx Node v{}", env!("CARGO_PKG_VERSION"));

    let config = NodeConfig::from_env()?;

    let detector = Arc::new(SidecarOcrClient::new(
        &config.ocr_endpoint,
        Duration::from_secs(config.ocr_timeout_secs),
    )?);

    let llm = Arc::new(GroqClient::new(
        &config.groq_endpoint,
        &config.groq_api_key,
        &config.groq_model,
        Duration::from_secs(config.llm_timeout_secs),
    )?);

    let store = Arc::new(ArtifactStore::new(
        config.image_dir.clone(),
        config.transcript_dir.clone(),
    ));

    let port = config.api_port;
    let state = AppState::new(detector, llm, store, Arc::new(config));

    start_server(state, port).await
}
