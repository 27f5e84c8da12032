// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR detection types and the detector collaborator trait
//!
//! A `Detection` is one OCR-reported text region: a bounding polygon in
//! pixel coordinates, the recognized text, and a confidence score. The
//! confidence is informational only; line reconstruction never consults it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the OCR collaborator
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("OCR service error: {0}")]
    Service(String),

    #[error("unreadable image: {0}")]
    UnreadableImage(String),
}

/// One recognized text region from the OCR engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding polygon corners as [x, y] pairs, pixel coordinates
    pub polygon: Vec<[f32; 2]>,
    /// Recognized text content
    pub text: String,
    /// Recognition confidence (0.0-1.0), informational only
    pub confidence: f32,
}

impl Detection {
    pub fn new(polygon: Vec<[f32; 2]>, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            polygon,
            text: text.into(),
            confidence,
        }
    }
}

/// Collaborator interface for text detection
///
/// The node talks to OCR through this seam so tests can inject a scripted
/// detector and the production sidecar client stays swappable.
#[async_trait]
pub trait TextDetector: Send + Sync {
    /// Run OCR over raw image bytes and return all recognized regions.
    async fn detect(&self, image_bytes: &[u8]) -> Result<Vec<Detection>, OcrError>;
}
