// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat-completion client for the extraction LLM (Groq, OpenAI-compatible API)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

/// Default Groq OpenAI-compatible endpoint
pub const DEFAULT_GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1";

/// Errors from the extraction service
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("extraction service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("extraction service error: {0}")]
    Service(String),
}

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(serde::Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Collaborator interface for the language-model service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a single-turn prompt and return the raw completion text.
    async fn complete(&self, prompt: &str, temperature: f32)
        -> Result<String, ExtractionError>;
}

/// Groq chat-completion client
pub struct GroqClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    /// Create a new client with a bounded request timeout.
    pub fn new(
        endpoint: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ExtractionError> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!("LLM client configured: endpoint={}, model={}", endpoint, model);

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, ExtractionError> {
        let url = format!("{}/chat/completions", self.endpoint);
        debug!("LLM request: {} prompt chars, temperature={}", prompt.len(), temperature);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Service(format!("{}: {}", status, body)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::Service(format!("malformed chat response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ExtractionError::Service("chat response has no choices".to_string()))?;

        debug!("LLM returned {} chars", content.len());
        Ok(content)
    }
}
