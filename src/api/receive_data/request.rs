// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Receive-data request type and validation
//!
//! The inbound contract is fixed by the upstream sender: a JSON object with
//! an `id` and a base64 image under the literal key `"String"`. Both fields
//! deserialize as raw JSON values so type errors become 400s with a useful
//! message instead of a rejected body.

use serde::Deserialize;

use crate::api::errors::ApiError;

/// Raw request body for POST /receive-data
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiveDataRequest {
    #[serde(default)]
    pub id: Option<serde_json::Value>,

    /// Base64-encoded image payload; legacy field name
    #[serde(default, rename = "String")]
    pub payload: Option<serde_json::Value>,
}

/// Validated request fields
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub id: String,
    pub payload: String,
}

impl ReceiveDataRequest {
    /// Validate presence and types of both fields.
    pub fn validate(&self) -> Result<ValidatedRequest, ApiError> {
        let (id, payload) = match (&self.id, &self.payload) {
            (Some(id), Some(payload)) => (id, payload),
            _ => {
                return Err(ApiError::InvalidRequest(
                    "Missing 'id' or 'String' key".to_string(),
                ))
            }
        };

        let id = id
            .as_str()
            .ok_or_else(|| ApiError::InvalidRequest("id must be string".to_string()))?;

        let payload = payload
            .as_str()
            .ok_or_else(|| ApiError::InvalidRequest("String must be text".to_string()))?;

        // The id names files on disk; keep it a plain name.
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(ApiError::InvalidRequest(
                "id must be a plain file name".to_string(),
            ));
        }

        Ok(ValidatedRequest {
            id: id.to_string(),
            payload: payload.to_string(),
        })
    }
}
