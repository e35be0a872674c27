//! Runtime configuration read from the environment.
//!
//! Recognised variables (a `.env` file is loaded first when present):
//! - OPENROUTER_API_KEY: bearer token for the completion endpoint
//! - OPENROUTER_MODEL: model id (default [`DEFAULT_MODEL`])
//! - OPENROUTER_BASE_URL: API root (default [`DEFAULT_BASE_URL`])
//! - OPENROUTER_REFERER: value of the `HTTP-Referer` header
//! - FLASHMASTER_AI_TIMEOUT_SECS: card extraction timeout (default 30)
//! - FLASHMASTER_AI_REQUEST_TIMEOUT_SECS: deadline for any single request (default 60)

use std::time::Duration;

pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-exp:free";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_REFERER: &str = "http://localhost";
pub const APP_TITLE: &str = "FlashMaster";
pub const DEFAULT_EXTRACTION_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Key value shipped in the sample `.env`; treated as unset.
const PLACEHOLDER_KEY: &str = "your_key_here";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub referer: String,
    pub extraction_timeout: Duration,
    /// Applies to every request, including quiz distractors and summaries.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            extraction_timeout: Duration::from_secs(DEFAULT_EXTRACTION_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = non_empty("OPENROUTER_API_KEY").filter(|key| key != PLACEHOLDER_KEY);
        let seconds = |key: &str| {
            non_empty(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
        };
        let extraction_timeout =
            seconds("FLASHMASTER_AI_TIMEOUT_SECS").unwrap_or(defaults.extraction_timeout);
        let request_timeout =
            seconds("FLASHMASTER_AI_REQUEST_TIMEOUT_SECS").unwrap_or(defaults.request_timeout);

        Self {
            api_key,
            model: non_empty("OPENROUTER_MODEL").unwrap_or(defaults.model),
            base_url: non_empty("OPENROUTER_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            referer: non_empty("OPENROUTER_REFERER").unwrap_or(defaults.referer),
            extraction_timeout,
            request_timeout,
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}
