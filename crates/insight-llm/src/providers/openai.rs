//! OpenAI provider implementation
//!
//! This module implements the InsightProvider trait for OpenAI chat models.
//! See: https://platform.openai.com/docs/api-reference/chat

use crate::{InsightProvider, ProviderError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4";
const MAX_TOKENS: usize = 4096;

/// OpenAI chat-completions provider
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with the default model
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Create a provider from environment variable
    ///
    /// Reads the API key from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ProviderError::ConfigurationError(
                "OPENAI_API_KEY environment variable not set".to_string(),
            )
        })?;
        Self::new(api_key)
    }

    /// Override the model used for completions
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl InsightProvider for OpenAIProvider {
    async fn generate_insights(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, "Sending request to OpenAI API");

        let request = ChatRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{OPENAI_API_BASE}/chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 => ProviderError::AuthenticationFailed,
                429 => ProviderError::RateLimitExceeded(error_text),
                400 => ProviderError::InvalidRequest(error_text),
                _ => ProviderError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                ProviderError::UnexpectedResponse("Response contained no choices".to_string())
            })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

// OpenAI-specific request/response types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}
