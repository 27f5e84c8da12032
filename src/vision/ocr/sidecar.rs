// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR sidecar client
//!
//! Talks to a co-deployed OCR service over HTTP. The sidecar owns the
//! expensive recognition model; this node only ships image bytes up and
//! detection polygons back. Constructed once at startup and shared.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use tracing::{debug, info};

use super::detection::{Detection, OcrError, TextDetector};

#[derive(serde::Serialize)]
struct DetectRequest {
    image: String,
}

#[derive(serde::Deserialize)]
struct DetectResponse {
    detections: Vec<Detection>,
}

/// Client for a sidecar OCR service
pub struct SidecarOcrClient {
    client: Client,
    endpoint: String,
}

impl SidecarOcrClient {
    /// Create a new client with a bounded request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, OcrError> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!("OCR sidecar client configured: endpoint={}", endpoint);

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl TextDetector for SidecarOcrClient {
    async fn detect(&self, image_bytes: &[u8]) -> Result<Vec<Detection>, OcrError> {
        let url = format!("{}/detect", self.endpoint);
        debug!("OCR request: {} bytes to {}", image_bytes.len(), url);

        let request = DetectRequest {
            image: STANDARD.encode(image_bytes),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Service(format!("{}: {}", status, body)));
        }

        let parsed: DetectResponse = response
            .json()
            .await
            .map_err(|e| OcrError::Service(format!("malformed detect response: {}", e)))?;

        debug!("OCR returned {} detections", parsed.detections.len());
        Ok(parsed.detections)
    }
}
