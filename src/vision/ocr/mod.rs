// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR integration: detection types, sidecar client, line reconstruction
//!
//! Components:
//! - `detection` - Detection type and the `TextDetector` collaborator trait
//! - `sidecar` - HTTP client for the co-deployed OCR service
//! - `layout` - grouping unordered detections into ordered text lines

pub mod detection;
pub mod layout;
pub mod sidecar;

pub use detection::{Detection, OcrError, TextDetector};
pub use layout::{group_into_line_texts, group_into_lines, Line, LayoutError, DEFAULT_Y_THRESHOLD};
pub use sidecar::SidecarOcrClient;
