// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod extraction;
pub mod storage;
pub mod text;
pub mod vision;

pub use api::{build_router, start_server, AppState};
pub use config::NodeConfig;
pub use extraction::{extract_medications, CompletionClient, ExtractionError, GroqClient};
pub use storage::ArtifactStore;
pub use vision::{Detection, OcrError, SidecarOcrClient, TextDetector};
