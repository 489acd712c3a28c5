//! Chat-completions client for the OpenRouter API.
//!
//! One POST per diagnosis, no retries. Callers get either the message
//! content or an [`UpstreamError`] describing why there is none.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DIAGNOSIS_MODEL: &str = "mistralai/mistral-7b-instruct:free";
pub const TEMPERATURE: f32 = 0.5;
pub const MAX_TOKENS: u32 = 800;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for completion calls.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("OpenRouter API failed: {status} {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Transport(String),

    #[error("Failed to decode completion response: {0}")]
    Decode(String),

    #[error("Empty response from API")]
    Empty,
}

/// Something that turns a prompt into completion text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, api_key: &Secret<String>, prompt: &str)
    -> Result<String, UpstreamError>;
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

impl<'a> ChatCompletionRequest<'a> {
    pub fn for_prompt(prompt: &'a str) -> Self {
        Self {
            model: DIAGNOSIS_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
    }
}

/// reqwest-backed OpenRouter client
#[derive(Clone)]
pub struct OpenRouterClient {
    http: Client,
    endpoint: String,
}

impl OpenRouterClient {
    pub fn new() -> anyhow::Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoint: OPENROUTER_API_URL.to_string(),
        })
    }

    /// Point the client at a different completions endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(
        &self,
        api_key: &Secret<String>,
        prompt: &str,
    ) -> Result<String, UpstreamError> {
        let request = ChatCompletionRequest::for_prompt(prompt);

        debug!(
            endpoint = %self.endpoint,
            model = DIAGNOSIS_MODEL,
            prompt_len = prompt.len(),
            "Sending request to OpenRouter API"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;

        completion.into_content().ok_or(UpstreamError::Empty)
    }
}
