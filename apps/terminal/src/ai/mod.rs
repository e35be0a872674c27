//! Chat-completion client and the study features built on it.

pub mod extract;
pub mod prompts;
pub mod quiz;
pub mod types;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::{Config, APP_TITLE};
use crate::error::{AiError, Result};
use types::{error_message, ChatMessage, ChatRequest, ChatResponse};

pub use extract::{extract_cards, strip_code_fences, ExtractionLog};
pub use quiz::{fetch_distractors, fetch_summary};

/// Message used when the endpoint fails without a readable error body.
const GENERIC_REMOTE_ERROR: &str = "Failed to fetch";

/// One system instruction plus one user message in, one completion out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Client for OpenRouter (or any OpenAI-compatible endpoint).
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    referer: String,
    timeout: Duration,
}

impl OpenRouterClient {
    /// Fails with [`AiError::Config`] when no API key is configured.
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AiError::Config("Please set OPENROUTER_API_KEY in your .env file.".to_string()))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AiError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.base_url),
            referer: config.referer.clone(),
            timeout: config.request_timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_error(&self, e: reqwest::Error) -> AiError {
        if e.is_timeout() {
            AiError::Timeout(self.timeout)
        } else {
            AiError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "sending completion request");

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", APP_TITLE)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = resp.status();
        debug!(status = status.as_u16(), "completion response");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let preview: String = body.chars().take(100).collect();
            debug!(body = %preview, "completion error body");
            return Err(AiError::Remote {
                status: status.as_u16(),
                message: error_message(&body).unwrap_or_else(|| GENERIC_REMOTE_ERROR.to_string()),
            });
        }

        let response: ChatResponse = resp
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.request_error(e)
                } else {
                    AiError::Malformed(e.to_string())
                }
            })?;

        response
            .into_content()
            .ok_or_else(|| AiError::Malformed("response has no choices".to_string()))
    }
}
