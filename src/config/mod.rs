// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration from environment variables

use std::env;
use std::path::PathBuf;

use crate::extraction::DEFAULT_GROQ_ENDPOINT;
use crate::vision::ocr::DEFAULT_Y_THRESHOLD;

/// Runtime configuration for the node
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// HTTP API port
    pub api_port: u16,
    /// Groq API key (required)
    pub groq_api_key: String,
    /// Groq model identifier
    pub groq_model: String,
    /// Groq OpenAI-compatible endpoint
    pub groq_endpoint: String,
    /// OCR sidecar endpoint
    pub ocr_endpoint: String,
    /// Directory for decoded source images
    pub image_dir: PathBuf,
    /// Directory for transcript artifacts
    pub transcript_dir: PathBuf,
    /// Pixel tolerance for same-line grouping
    pub y_threshold: f32,
    /// OCR request timeout in seconds
    pub ocr_timeout_secs: u64,
    /// LLM request timeout in seconds
    pub llm_timeout_secs: u64,
}

impl NodeConfig {
    /// Load configuration from environment variables.
    ///
    /// A missing `GROQ_API_KEY` is a fatal startup error; everything else
    /// has a default.
    pub fn from_env() -> anyhow::Result<Self> {
        let groq_api_key = env::var("GROQ_API_KEY")
            .map_err(|_| anyhow::anyhow!("GROQ_API_KEY is not set. Check your .env file."))?;

        Ok(Self {
            api_port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            groq_api_key,
            groq_model: env::var("GROQ_MODEL")
                .unwrap_or_else(|_| "openai/gpt-oss-120b".to_string()),
            groq_endpoint: env::var("GROQ_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_GROQ_ENDPOINT.to_string()),
            ocr_endpoint: env::var("OCR_ENDPOINT")
                .unwrap_or_else(|_| "http://127.0.0.1:9001".to_string()),
            image_dir: env::var("IMAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/input_image")),
            transcript_dir: env::var("TRANSCRIPT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/transcripts")),
            y_threshold: env::var("LINE_Y_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_Y_THRESHOLD),
            ocr_timeout_secs: env::var("OCR_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            llm_timeout_secs: env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        })
    }
}
