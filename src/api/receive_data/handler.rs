// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Receive-data endpoint handler
//!
//! Runs the full pipeline for one request: base64 payload -> image bytes ->
//! OCR detections -> grouped lines -> transcript artifact -> normalized
//! text -> medication list. Validation problems are 400s; everything that
//! fails after validation is caught here once and reported as a single 500
//! with the underlying message. No partial results.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{debug, info, warn};

use super::request::ReceiveDataRequest;
use super::response::ReceiveDataResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::extraction::extract_medications;
use crate::text::normalize_lines;
use crate::vision::ocr::group_into_line_texts;
use crate::vision::{decode_image_payload, detect_format, format_to_extension};

/// POST /receive-data - Process one prescription image
///
/// # Request
/// JSON body `{"id": string, "String": string}` where `String` holds the
/// base64-encoded image (bare or data-URI).
///
/// # Response
/// - 200: `{"message", "image_path", "docx_path", "text", "medications"}`
/// - 400: body is not valid JSON, keys missing, or values not strings
/// - 500: `{"error": "Processing failed: <detail>"}` on any pipeline failure
pub async fn receive_data_handler(
    State(state): State<AppState>,
    body: Result<Json<ReceiveDataRequest>, JsonRejection>,
) -> Result<Json<ReceiveDataResponse>, ApiError> {
    let Json(request) = body.map_err(|_| {
        ApiError::InvalidRequest("Request body must be valid JSON".to_string())
    })?;

    let validated = request.validate().map_err(|e| {
        warn!("receive-data validation failed: {}", e.message());
        e
    })?;

    debug!("receive-data request accepted: id={}", validated.id);

    let response = run_pipeline(&state, &validated.id, &validated.payload)
        .await
        .map_err(|e| {
            warn!("pipeline failed for id={}: {:#}", validated.id, e);
            ApiError::ProcessingFailed(e.to_string())
        })?;

    info!(
        "processed id={}: {} medications",
        validated.id,
        response.medications.len()
    );
    Ok(Json(response))
}

/// Decode, OCR, group, clean and extract for a single request.
async fn run_pipeline(
    state: &AppState,
    id: &str,
    payload: &str,
) -> anyhow::Result<ReceiveDataResponse> {
    // Ingress: base64 payload -> raw image bytes, persisted under the id.
    let image_bytes = decode_image_payload(payload)?;
    let extension = format_to_extension(detect_format(&image_bytes)?);
    let image_path = state.store.save_image(id, &image_bytes, extension).await?;

    // OCR and line reconstruction.
    let detections = state.detector.detect(&image_bytes).await?;
    debug!("id={}: {} detections", id, detections.len());

    let lines = group_into_line_texts(&detections, state.config.y_threshold)?;
    let transcript_path = state.store.write_transcript(id, &lines).await?;

    // Clean the transcript read back from the artifact, so the text the
    // caller sees is exactly what the stored document yields.
    let paragraphs = state.store.read_transcript(&transcript_path).await?;
    let cleaned = normalize_lines(&paragraphs);
    let text = cleaned.join("\n");

    let medications = extract_medications(state.llm.as_ref(), &text).await?;

    Ok(ReceiveDataResponse::new(
        image_path.display().to_string(),
        transcript_path.display().to_string(),
        text,
        medications,
    ))
}
