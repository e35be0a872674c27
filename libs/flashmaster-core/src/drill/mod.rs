//! Practice drills over the card store.

pub mod flashcard;
pub mod matching;
pub mod quiz;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Behaviour common to every drill.
pub trait Drill {
    /// Drill identifier.
    fn kind(&self) -> DrillKind;

    /// Time until the drill's next scheduled transition, if any.
    fn time_until_next(&self) -> Option<Duration>;
}

/// Drill options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillKind {
    Flashcards,
    Quiz,
    Match,
}

impl Default for DrillKind {
    fn default() -> Self {
        Self::Flashcards
    }
}

impl DrillKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flashcards => "flashcards",
            Self::Quiz => "quiz",
            Self::Match => "match",
        }
    }

    /// Parse from string, accepting short aliases.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "flashcards" | "flash" | "study" => Some(Self::Flashcards),
            "quiz" => Some(Self::Quiz),
            "match" => Some(Self::Match),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_uses_snake_case_names() {
        assert_eq!(serde_json::to_string(&DrillKind::Flashcards).unwrap(), r#""flashcards""#);
        let kind: DrillKind = serde_json::from_str(r#""match""#).unwrap();
        assert_eq!(kind, DrillKind::Match);
        assert_eq!(DrillKind::from_str(kind.as_str()), Some(kind));
    }
}
