//! Error types for flashmaster-core.

use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing `TERM,DEFINITION` text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line} is missing a comma: \"{content}\"")]
    MissingComma { line: usize, content: String },

    #[error("line {line} has an empty term or definition: \"{content}\"")]
    EmptyField { line: usize, content: String },

    #[error("no valid cards found")]
    NoCards,
}

impl ParseError {
    /// 1-based line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MissingComma { line, .. } | Self::EmptyField { line, .. } => Some(*line),
            Self::NoCards => None,
        }
    }
}

/// Errors returned by quiz transitions that cannot proceed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("not enough cards: need at least {need}, have {have}")]
    NotEnoughCards { need: usize, have: usize },

    #[error("a distractor request is already in flight")]
    RequestInFlight,
}
