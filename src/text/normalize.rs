// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Transcript normalization
//!
//! OCR output of scanned prescriptions carries predictable junk: stock-photo
//! watermarks, words shattered into single letters ("C r y s t a l"), '|'
//! misread for lowercase 'l', and ragged whitespace. This pass cleans a
//! grouped transcript line by line; lines reduced to nothing are dropped,
//! not kept as empty placeholders.

use std::sync::OnceLock;

use regex::Regex;

/// Watermark marker; any line containing it (case-insensitive) is dropped
const WATERMARK_MARKER: &str = "shutter";

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Normalize grouped transcript lines.
///
/// Per line, in order: drop watermark lines, rejoin spaced-out letters,
/// collapse whitespace runs, drop lines left empty. Surviving lines keep
/// their original order. Idempotent on already-normalized input.
pub fn normalize_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| normalize_line(line.as_ref()))
        .collect()
}

fn normalize_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line.to_lowercase().contains(WATERMARK_MARKER) {
        return None;
    }

    let rejoined = rejoin_spaced_letters(line);
    let collapsed = whitespace_re()
        .replace_all(&rejoined, " ")
        .trim()
        .to_string();

    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Merge runs of single-letter tokens back into words.
///
/// `C r y s t a |  Ey e s` becomes `Crystal Ey es` -> the '|' is first
/// rewritten to 'l' inside every token, then each run of consecutive
/// single-alphabetic tokens is concatenated (the two-char `Ey` breaks the
/// run, so `e s` merges on its own). A genuine one-letter word sitting next
/// to another gets merged too; accepted heuristic limitation.
fn rejoin_spaced_letters(line: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut buffer = String::new();

    for token in line.split_whitespace() {
        let token = token.replace('|', "l");

        let mut chars = token.chars();
        let single_alpha = matches!(
            (chars.next(), chars.next()),
            (Some(c), None) if c.is_alphabetic()
        );

        if single_alpha {
            buffer.push_str(&token);
        } else {
            if !buffer.is_empty() {
                out.push(std::mem::take(&mut buffer));
            }
            out.push(token);
        }
    }

    if !buffer.is_empty() {
        out.push(buffer);
    }

    out.join(" ")
}
