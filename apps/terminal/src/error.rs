//! Errors from the completion endpoint and its call sites.

use flashmaster_core::ParseError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result type alias for AI operations.
pub type Result<T> = std::result::Result<T, AiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_shows_extracted_message() {
        let error = AiError::Remote {
            status: 401,
            message: "Invalid API key".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid API key");
    }

    #[test]
    fn parse_error_passes_through() {
        let error: AiError = ParseError::NoCards.into();
        assert_eq!(error.to_string(), "no valid cards found");
        assert!(matches!(error, AiError::Parse(ParseError::NoCards)));
    }

    #[test]
    fn timeout_names_duration() {
        assert_eq!(
            AiError::Timeout(Duration::from_secs(30)).to_string(),
            "request timed out after 30s"
        );
        assert_eq!(
            AiError::Timeout(Duration::from_millis(500)).to_string(),
            "request timed out after 0.5s"
        );
    }
}
