// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Structured medication extraction via the Groq LLM service
//!
//! Components:
//! - `client` - OpenAI-compatible chat client and the `CompletionClient` trait
//! - `medications` - prompt construction, reply parsing, dedup

pub mod client;
pub mod medications;

pub use client::{CompletionClient, ExtractionError, GroqClient, DEFAULT_GROQ_ENDPOINT};
pub use medications::{extract_medications, ModelOutput};
