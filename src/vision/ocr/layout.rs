// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Line reconstruction from unordered OCR detections
//!
//! The OCR engine reports word-level boxes in no particular order. This
//! module rebuilds human-readable lines from them: each detection becomes a
//! positioned token (y-center, leftmost x), tokens are sorted top-to-bottom
//! then left-to-right, and a single scan buckets them into lines against a
//! pixel tolerance.
//!
//! Grouping policy: a line's anchor is the y-center of its FIRST token and
//! is never updated as tokens are added. Every candidate token is compared
//! to the anchor, not to its predecessor, so a line can only reach one
//! threshold above and below the anchor and slightly rotated text may split.
//! Known limitation, kept deliberately; switching to a running-average
//! anchor changes observable grouping and needs a product decision first.

use thiserror::Error;

use super::detection::Detection;

/// Default pixel tolerance for "same line"
pub const DEFAULT_Y_THRESHOLD: f32 = 15.0;

/// Errors from line reconstruction
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid detection '{text}': polygon has no points")]
    InvalidDetection { text: String },
}

/// A detection reduced to the coordinates line grouping needs
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken {
    /// Mean of the polygon's y coordinates
    pub y_center: f32,
    /// Minimum of the polygon's x coordinates
    pub x_min: f32,
    /// Recognized text
    pub text: String,
}

impl PositionedToken {
    /// Reduce a detection to a positioned token.
    ///
    /// Returns `None` for detections whose text is empty after trimming;
    /// those produce no output at all. An empty polygon is malformed input.
    fn from_detection(det: &Detection) -> Result<Option<Self>, LayoutError> {
        let text = det.text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        if det.polygon.is_empty() {
            return Err(LayoutError::InvalidDetection {
                text: text.to_string(),
            });
        }

        let y_sum: f32 = det.polygon.iter().map(|p| p[1]).sum();
        let y_center = y_sum / det.polygon.len() as f32;
        let x_min = det
            .polygon
            .iter()
            .map(|p| p[0])
            .fold(f32::INFINITY, f32::min);

        Ok(Some(Self {
            y_center,
            x_min,
            text: text.to_string(),
        }))
    }
}

/// One reconstructed row of text
#[derive(Debug, Clone)]
pub struct Line {
    /// y-center of the first token assigned to this line (the anchor)
    pub anchor: f32,
    /// Tokens in ascending x_min order
    pub tokens: Vec<PositionedToken>,
}

impl Line {
    /// Render the line: token texts joined by single spaces, left to right.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Group OCR detections into ordered text lines.
///
/// Blank-text detections are discarded up front. The remaining tokens are
/// sorted by (y_center, x_min) and scanned once: a token joins the current
/// line iff its y-center is within `y_threshold` of the line's anchor,
/// otherwise the line is flushed and the token starts a new one. Flushed
/// lines are re-sorted by x_min (the outer sort's primary key is y_center,
/// so near-ties can arrive x-unsorted).
///
/// An empty input, or one that is empty after discarding blanks, yields an
/// empty vec.
pub fn group_into_lines(
    detections: &[Detection],
    y_threshold: f32,
) -> Result<Vec<Line>, LayoutError> {
    let mut tokens = Vec::with_capacity(detections.len());
    for det in detections {
        if let Some(tok) = PositionedToken::from_detection(det)? {
            tokens.push(tok);
        }
    }

    // Top-to-bottom, then left-to-right scan order. The only ordering step.
    tokens.sort_by(|a, b| {
        a.y_center
            .total_cmp(&b.y_center)
            .then(a.x_min.total_cmp(&b.x_min))
    });

    let mut lines = Vec::new();
    let mut current: Vec<PositionedToken> = Vec::new();
    let mut anchor: Option<f32> = None;

    for tok in tokens {
        match anchor {
            None => {
                anchor = Some(tok.y_center);
                current.push(tok);
            }
            Some(a) if (tok.y_center - a).abs() <= y_threshold => {
                // Anchor stays pinned to the line's first token.
                current.push(tok);
            }
            Some(a) => {
                lines.push(flush_line(a, std::mem::take(&mut current)));
                anchor = Some(tok.y_center);
                current.push(tok);
            }
        }
    }

    if let Some(a) = anchor {
        if !current.is_empty() {
            lines.push(flush_line(a, current));
        }
    }

    Ok(lines)
}

/// Group detections and render each line as its joined text.
pub fn group_into_line_texts(
    detections: &[Detection],
    y_threshold: f32,
) -> Result<Vec<String>, LayoutError> {
    let lines = group_into_lines(detections, y_threshold)?;
    Ok(lines.iter().map(Line::text).collect())
}

fn flush_line(anchor: f32, mut tokens: Vec<PositionedToken>) -> Line {
    // Stable sort: equal x_min keeps scan order.
    tokens.sort_by(|a, b| a.x_min.total_cmp(&b.x_min));
    Line { anchor, tokens }
}
