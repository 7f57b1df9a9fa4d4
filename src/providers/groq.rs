//! Groq chat completions client.
//!
//! Groq exposes an OpenAI-compatible endpoint, so this client works
//! against any service speaking the same `/chat/completions` dialect.
//! See: <https://console.groq.com/docs/api-reference#chat-create>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::CompletionClient;
use crate::types::{ChatRequest, Message};
use crate::{HuginnError, Result};

/// Default base URL for the Groq OpenAI-compatible API
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Environment variable overriding the base URL.
pub const COMPLETION_URL_ENV: &str = "HUGINN_COMPLETION_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for an OpenAI-compatible chat completions API.
///
/// Holds no credential of its own; the gateway passes one per call.
#[derive(Clone)]
pub struct GroqClient {
    http: Client,
    base_url: String,
}

impl GroqClient {
    /// Create a client for the public Groq endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom base URL and request timeout.
    pub fn with_options(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HuginnError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Map a non-success response to the matching error.
    async fn error_from_response(response: reqwest::Response) -> HuginnError {
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        match HuginnError::from_status(status, message) {
            HuginnError::RateLimited { .. } => HuginnError::RateLimited { retry_after },
            other => other,
        }
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, credential: &str, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(credential)
            .json(&CompletionBody {
                model: &request.model,
                messages: &request.messages,
                temperature: request.temperature,
                max_tokens: request.max_tokens,
            })
            .send()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let raw = response
            .text()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))?;
        let body: CompletionResponse = serde_json::from_str(&raw)?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default())
    }
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}
