// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Medication extraction from a cleaned prescription transcript
//!
//! Builds the extraction prompt, invokes the LLM with deterministic
//! sampling, and parses the reply. Model output is handled as two explicit
//! variants: the JSON the prompt asks for, or freeform lines when the model
//! ignores the contract. A malformed reply never fails the request; it
//! degrades to line splitting and may legitimately yield nothing.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::client::{CompletionClient, ExtractionError};

/// Leading junk stripped from freeform fallback lines
const BULLET_CHARS: &[char] = &['-', '•', '*', ','];

/// Parsed model reply
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    /// Reply honored the JSON contract
    StructuredJson(Vec<String>),
    /// Reply was not valid JSON; one candidate per non-empty line
    FreeformLines(Vec<String>),
}

impl ModelOutput {
    pub fn into_names(self) -> Vec<String> {
        match self {
            ModelOutput::StructuredJson(names) | ModelOutput::FreeformLines(names) => names,
        }
    }
}

/// Extract unique medication names from a cleaned transcript.
///
/// An empty or whitespace-only transcript short-circuits to an empty list
/// without touching the service. Service and transport failures propagate;
/// malformed model output does not.
pub async fn extract_medications(
    client: &dyn CompletionClient,
    document_text: &str,
) -> Result<Vec<String>, ExtractionError> {
    if document_text.trim().is_empty() {
        debug!("empty transcript, skipping extraction call");
        return Ok(Vec::new());
    }

    let prompt = build_prompt(document_text);
    let reply = client.complete(&prompt, 0.0).await?;

    let output = parse_model_output(&reply);
    if matches!(output, ModelOutput::FreeformLines(_)) {
        warn!("model reply was not valid JSON, using freeform line fallback");
    }

    Ok(dedupe_case_insensitive(output.into_names()))
}

/// Build the extraction prompt around the transcript.
pub fn build_prompt(prescription_text: &str) -> String {
    format!(
        r#"You are a medical prescription parser.

From the text below, extract ONLY the names of medicines, injections,
or saline solutions prescribed.

Rules:
- Return UNIQUE medication names only.
- Do NOT include dose, strength, route, frequency or quantity.
- Ignore headings, allergies, diagnosis, physician info, dates, etc.
- If a line has "Vitamin € ", return just "Vitamin C".
- Output MUST be valid JSON in exactly this format:

{{
  "medications": ["name1", "name2", "name3"]
}}

Here is the text:

"""{prescription_text}"""
"#
    )
}

/// Parse the raw model reply into one of the two output variants.
///
/// Valid JSON: the `medications` field may be a list or a bare string (the
/// string wraps to a one-element list); elements are stringified and
/// trimmed, empties dropped; a missing or unusable field yields an empty
/// structured result. Anything that is not valid JSON becomes
/// `FreeformLines` with leading bullet/dash/asterisk/comma junk stripped.
pub fn parse_model_output(raw: &str) -> ModelOutput {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => {
            let names = match value.get("medications") {
                Some(serde_json::Value::String(s)) => {
                    let s = s.trim();
                    if s.is_empty() {
                        Vec::new()
                    } else {
                        vec![s.to_string()]
                    }
                }
                Some(serde_json::Value::Array(items)) => items
                    .iter()
                    .filter_map(|item| {
                        let s = match item.as_str() {
                            Some(s) => s.trim().to_string(),
                            None => item.to_string().trim().to_string(),
                        };
                        if s.is_empty() {
                            None
                        } else {
                            Some(s)
                        }
                    })
                    .collect(),
                _ => Vec::new(),
            };
            ModelOutput::StructuredJson(names)
        }
        Err(_) => {
            let lines = raw
                .lines()
                .map(|line| {
                    line.trim()
                        .trim_matches(|c: char| BULLET_CHARS.contains(&c))
                        .trim()
                        .to_string()
                })
                .filter(|line| !line.is_empty())
                .collect();
            ModelOutput::FreeformLines(lines)
        }
    }
}

/// Case-insensitive dedup keeping first-seen casing and order.
pub fn dedupe_case_insensitive(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();

    for name in names {
        let key = name.to_lowercase();
        if seen.insert(key) {
            unique.push(name);
        }
    }

    unique
}
