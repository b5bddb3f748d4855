//! OpenAI-compatible chat completion adapter
//!
//! Implements [`ChatModel`] against any endpoint that speaks the
//! `/chat/completions` protocol.
//!
//! # Error Handling
//!
//! HTTP failures are mapped to `PortError` variants:
//! - 401/403 -> `PortError::Unauthorized`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Connection failures -> `PortError::Connection`
//! - Anything else, including an empty reply -> `PortError::Internal` or `Transformation`

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use core_kernel::PortError;

use crate::llm_coverage::ChatModel;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Connection settings for the chat endpoint
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Base URL without the trailing `/chat/completions`
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            timeout_secs: 30,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Chat model reached over HTTP
pub struct OpenAiChatModel {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiChatModel {
    /// Creates the adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is blank or the HTTP client cannot be built
    pub fn new(config: OpenAiConfig) -> Result<Self, PortError> {
        if config.api_key.trim().is_empty() {
            return Err(PortError::validation("LLM API key is not configured"));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PortError::Internal {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> PortError {
        if e.is_timeout() {
            PortError::Timeout {
                operation: "chat_completion".to_string(),
                duration_ms: self.config.timeout_secs * 1000,
            }
        } else if e.is_connect() {
            PortError::Connection {
                message: format!("cannot reach {}", self.config.base_url),
                source: Some(Box::new(e)),
            }
        } else {
            PortError::Internal {
                message: "chat completion request failed".to_string(),
                source: Some(Box::new(e)),
            }
        }
    }
}

fn map_status(status: StatusCode, body: &str) -> PortError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized {
            message: format!("chat endpoint rejected credentials ({})", status),
        },
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited { retry_after_secs: 60 },
        s if s.is_server_error() => PortError::ServiceUnavailable {
            service: format!("chat completions ({})", s),
        },
        s => PortError::internal(format!("Unexpected status {}: {}", s, body)),
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, prompt: &str) -> Result<String, PortError> {
        let url = self.endpoint();
        tracing::debug!(url = %url, model = %self.config.model, prompt_len = prompt.len(), "Requesting chat completion");

        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, &body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| PortError::transformation(format!("Failed to deserialize completion: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| PortError::transformation("completion contained no message content"))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
