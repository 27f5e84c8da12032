// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module
//!
//! This module provides:
//! - Image payload decoding (base64 / data-URI ingress)
//! - OCR via a sidecar service, plus line reconstruction from detections

pub mod image_utils;
pub mod ocr;

pub use image_utils::{decode_image_payload, detect_format, format_to_extension, PayloadError};
pub use ocr::{Detection, OcrError, SidecarOcrClient, TextDetector};
