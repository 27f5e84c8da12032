// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Receive-data response type

use serde::{Deserialize, Serialize};

/// Success response for POST /receive-data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveDataResponse {
    pub message: String,
    /// Path of the persisted source image
    pub image_path: String,
    /// Path of the transcript artifact; legacy field name
    pub docx_path: String,
    /// Cleaned multi-line transcript
    pub text: String,
    /// Unique medication names, first-seen order
    pub medications: Vec<String>,
}

impl ReceiveDataResponse {
    pub fn new(
        image_path: String,
        docx_path: String,
        text: String,
        medications: Vec<String>,
    ) -> Self {
        Self {
            message: "Data processed successfully".to_string(),
            image_path,
            docx_path,
            text,
            medications,
        }
    }
}
