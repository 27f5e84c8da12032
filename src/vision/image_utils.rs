// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image payload decoding for the ingress adapter

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use thiserror::Error;

/// Maximum decoded image size (10MB)
const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// How far into the payload a data-URI comma may appear
const DATA_URI_PREFIX_WINDOW: usize = 50;

/// Errors for malformed inbound image payloads
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid payload: empty base64 string")]
    Empty,

    #[error("invalid payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("invalid payload: image data is too large ({0} bytes, max {1})")]
    TooLarge(usize, usize),

    #[error("invalid payload: unsupported image format")]
    UnsupportedFormat,
}

/// Decode a base64 image payload to raw bytes.
///
/// Accepts both bare base64 and `data:image/png;base64,...` style payloads;
/// a data-URI prefix is recognized by a comma within the first 50 characters
/// preceded by the substring "base64", and stripped before decoding.
pub fn decode_image_payload(payload: &str) -> Result<Vec<u8>, PayloadError> {
    if payload.trim().is_empty() {
        return Err(PayloadError::Empty);
    }

    let encoded = strip_data_uri_prefix(payload);
    let bytes = STANDARD.decode(encoded.trim())?;

    if bytes.is_empty() {
        return Err(PayloadError::Empty);
    }
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(PayloadError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    Ok(bytes)
}

fn strip_data_uri_prefix(payload: &str) -> &str {
    let window_end = payload
        .char_indices()
        .map(|(i, _)| i)
        .nth(DATA_URI_PREFIX_WINDOW)
        .unwrap_or(payload.len());
    let window = &payload[..window_end];

    match window.find(',') {
        Some(comma) if window[..comma].contains("base64") => &payload[comma + 1..],
        _ => payload,
    }
}

/// Detect image format from magic bytes
///
/// Used to pick the saved artifact's file extension; the OCR sidecar gets
/// the raw bytes either way.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, PayloadError> {
    if bytes.len() < 4 {
        return Err(PayloadError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        _ => Err(PayloadError::UnsupportedFormat),
    }
}

/// Get the format extension as a string
pub fn format_to_extension(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpg",
        ImageFormat::WebP => "webp",
        ImageFormat::Gif => "gif",
        ImageFormat::Bmp => "bmp",
        _ => "png",
    }
}
