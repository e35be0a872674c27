//! Turn free-form notes into cards via the completion endpoint.

use chrono::Local;
use flashmaster_core::{parse, Card};
use std::time::Duration;
use tracing::{info, warn};

use super::prompts::EXTRACT_CARDS;
use super::CompletionClient;
use crate::error::{AiError, Result};

/// Timestamped progress lines for one extraction attempt.
#[derive(Debug, Default)]
pub struct ExtractionLog {
    entries: Vec<String>,
}

impl ExtractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(target: "flashmaster::extract", "{}", message);
        self.entries
            .push(format!("{}: {}", Local::now().format("%H:%M:%S"), message));
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Remove markdown code-fence markers the model was told not to send.
pub fn strip_code_fences(content: &str) -> String {
    content.replace("```csv", "").replace("```", "").trim().to_string()
}

/// Ask the endpoint for `TERM,DEFINITION` lines and parse them.
///
/// `client` is `None` when no API key is configured. Nothing is returned
/// unless the whole reply parses.
pub async fn extract_cards(
    client: Option<&dyn CompletionClient>,
    text: &str,
    timeout: Duration,
    log: &mut ExtractionLog,
) -> Result<Vec<Card>> {
    log.push("Starting process...");

    let Some(client) = client else {
        log.push("Missing API key");
        return Err(AiError::Config(
            "Please set OPENROUTER_API_KEY in your .env file.".to_string(),
        ));
    };

    if text.trim().is_empty() {
        log.push("Empty text");
        return Err(AiError::Validation(
            "Please enter some text to generate cards from.".to_string(),
        ));
    }

    log.push("Sending request to completion endpoint...");
    let content = match tokio::time::timeout(timeout, client.complete(EXTRACT_CARDS, text)).await {
        Ok(Ok(content)) => content,
        Ok(Err(e)) => {
            warn!(error = %e, "card extraction failed");
            log.push(format!("Caught error: {}", e));
            return Err(e);
        }
        Err(_) => {
            warn!(?timeout, "card extraction timed out");
            log.push("Request timed out!");
            return Err(AiError::Timeout(timeout));
        }
    };

    log.push("Data received, parsing...");
    let cleaned = strip_code_fences(&content);
    log.push(format!("Content length: {}", cleaned.len()));

    let cards = parse(&cleaned).map_err(|e| {
        log.push(format!("Caught error: {}", e));
        AiError::from(e)
    })?;

    log.push(format!("Done! {} cards", cards.len()));
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flashmaster_core::ParseError;
    use std::sync::Mutex;

    struct FakeClient {
        reply: std::result::Result<String, u16>,
        delay: Duration,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeClient {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                delay: Duration::ZERO,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for FakeClient {
        async fn complete(&self, system: &str, user: &str) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(AiError::Remote {
                    status: *status,
                    message: "Invalid API key".to_string(),
                }),
            }
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(30);

    #[test]
    fn strips_fences() {
        assert_eq!(
            strip_code_fences("```csv\nAES,Advanced\n```\n"),
            "AES,Advanced"
        );
        assert_eq!(strip_code_fences("```\na,b\n```"), "a,b");
        assert_eq!(strip_code_fences("a,b"), "a,b");
    }

    #[tokio::test]
    async fn extracts_cards_from_fenced_reply() {
        let client = FakeClient::replying("```csv\nAES,Advanced Encryption Standard\nCIA,Triad\n```");
        let mut log = ExtractionLog::new();

        let cards = extract_cards(Some(&client), "notes about security", TIMEOUT, &mut log)
            .await
            .unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].term, "AES");
        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, EXTRACT_CARDS);
        assert_eq!(calls[0].1, "notes about security");
        assert!(log.entries().last().unwrap().contains("Done!"));
    }

    #[tokio::test]
    async fn missing_client_fails_before_validation() {
        let mut log = ExtractionLog::new();
        let result = extract_cards(None, "", TIMEOUT, &mut log).await;
        assert!(matches!(result, Err(AiError::Config(_))));
    }

    #[tokio::test]
    async fn blank_text_fails_without_calling() {
        let client = FakeClient::replying("a,b");
        let mut log = ExtractionLog::new();
        let result = extract_cards(Some(&client), "  \n ", TIMEOUT, &mut log).await;
        assert!(matches!(result, Err(AiError::Validation(_))));
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn parser_errors_propagate() {
        let client = FakeClient::replying("Here are your cards:\nAES,Advanced");
        let mut log = ExtractionLog::new();
        let result = extract_cards(Some(&client), "notes", TIMEOUT, &mut log).await;
        assert!(matches!(
            result,
            Err(AiError::Parse(ParseError::MissingComma { line: 1, .. }))
        ));
    }

    #[tokio::test]
    async fn remote_errors_propagate() {
        let client = FakeClient {
            reply: Err(401),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        };
        let mut log = ExtractionLog::new();
        let result = extract_cards(Some(&client), "notes", TIMEOUT, &mut log).await;
        assert!(matches!(result, Err(AiError::Remote { status: 401, .. })));
        assert!(log.entries().iter().any(|e| e.contains("Invalid API key")));
    }

    #[tokio::test]
    async fn slow_reply_times_out() {
        let client = FakeClient {
            reply: Ok("a,b".to_string()),
            delay: Duration::from_secs(5),
            calls: Mutex::new(Vec::new()),
        };
        let mut log = ExtractionLog::new();
        let timeout = Duration::from_millis(50);
        let result = extract_cards(Some(&client), "notes", timeout, &mut log).await;
        assert!(matches!(result, Err(AiError::Timeout(t)) if t == timeout));
        assert!(log.entries().iter().any(|e| e.contains("timed out")));
    }
}
