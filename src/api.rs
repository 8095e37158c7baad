//! OpenAI-compatible chat-completion client.
//!
//! # Architecture
//!
//! - [`ChatClient`]: Core trait for sending one chat-completion request
//! - [`OpenAiClient`]: `reqwest` implementation posting to
//!   `{api_base}/chat/completions` with a bearer token
//!
//! The client makes exactly one request per call. Transport failures,
//! non-2xx answers (bad key, exhausted quota) and malformed bodies are all
//! returned as [`ApiError`]; nothing is retried.

use crate::config::LlmConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Failure of a chat-completion request.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM response contained no choices")]
    EmptyResponse,

    #[error("LLM response did not report token usage")]
    MissingUsage,
}

/// One message of a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self::with_role("system", content)
    }

    pub fn user(content: &str) -> Self {
        Self::with_role("user", content)
    }

    fn with_role(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// Body of a `POST /chat/completions` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// The parts of a chat-completion response this crate reads.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

/// Token accounting reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl ChatResponse {
    /// Content of the first choice.
    pub fn first_content(&self) -> Result<&str, ApiError> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or(ApiError::EmptyResponse)
    }

    pub fn total_tokens(&self) -> Result<u64, ApiError> {
        self.usage
            .map(|usage| usage.total_tokens)
            .ok_or(ApiError::MissingUsage)
    }
}

/// Trait for sending a chat-completion request.
///
/// Implemented by [`OpenAiClient`] for real traffic and by fakes in tests.
pub trait ChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;
}

/// [`ChatClient`] for OpenAI and any server exposing the same API.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl OpenAiClient {
    /// Build a client from explicit settings; nothing is read from the
    /// environment here.
    pub fn new(config: &LlmConfig, api_key: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl ChatClient for OpenAiClient {
    #[instrument(level = "info", skip_all, fields(model = %request.model))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let t0 = Instant::now();
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Chat completion rejected"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = response.json::<ChatResponse>().await?;
        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            choices = parsed.choices.len(),
            "Chat completion received"
        );
        Ok(parsed)
    }
}
