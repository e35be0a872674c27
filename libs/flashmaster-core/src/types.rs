//! Core types shared by the card store and the drills.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::parser::clean_field;

/// A term/definition study unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub term: String,
    pub definition: String,
}

impl Card {
    /// Normalize a raw pair into a card with a fresh id.
    ///
    /// Returns `None` when either side is empty after cleaning.
    pub fn new(term: &str, definition: &str) -> Option<Self> {
        let term = clean_field(term);
        let definition = clean_field(definition);
        if term.is_empty() || definition.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4().to_string(),
            term: term.to_string(),
            definition: definition.to_string(),
        })
    }
}

/// Which side of a card a question shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Show the definition, ask for the term.
    #[serde(rename = "def-to-term")]
    DefToTerm,
    /// Show the term, ask for the definition.
    #[serde(rename = "term-to-def")]
    TermToDef,
}

impl Default for Direction {
    fn default() -> Self {
        Self::DefToTerm
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefToTerm => "def-to-term",
            Self::TermToDef => "term-to-def",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "def-to-term" => Some(Self::DefToTerm),
            "term-to-def" => Some(Self::TermToDef),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::DefToTerm => Self::TermToDef,
            Self::TermToDef => Self::DefToTerm,
        }
    }

    /// Text shown as the question for a card.
    pub fn prompt<'a>(&self, card: &'a Card) -> &'a str {
        match self {
            Self::DefToTerm => &card.definition,
            Self::TermToDef => &card.term,
        }
    }

    /// Text shown on an answer option for a card.
    pub fn answer<'a>(&self, card: &'a Card) -> &'a str {
        match self {
            Self::DefToTerm => &card.term,
            Self::TermToDef => &card.definition,
        }
    }
}

/// Face of a match tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Term,
    Definition,
}

/// One face-up tile in the match drill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: String,
    pub card_id: String,
    pub content: String,
    pub kind: TileKind,
}

impl Tile {
    /// The term and definition tiles for a card.
    pub fn pair(card: &Card) -> [Tile; 2] {
        [
            Tile {
                id: format!("{}-term", card.id),
                card_id: card.id.clone(),
                content: card.term.clone(),
                kind: TileKind::Term,
            },
            Tile {
                id: format!("{}-def", card.id),
                card_id: card.id.clone(),
                content: card.definition.clone(),
                kind: TileKind::Definition,
            },
        ]
    }
}

/// A multiple-choice option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub term: String,
    pub definition: String,
    pub label: String,
    /// Set only for options synthesized by the completion endpoint.
    pub is_distractor: bool,
}

impl QuizOption {
    /// Option backed by a real card.
    pub fn from_card(card: &Card, direction: Direction) -> Self {
        Self {
            id: card.id.clone(),
            term: card.term.clone(),
            definition: card.definition.clone(),
            label: direction.answer(card).to_string(),
            is_distractor: false,
        }
    }

    /// Synthesized wrong answer for `target`.
    pub fn synthesized(index: usize, text: &str, target: &Card, direction: Direction) -> Self {
        let (term, definition) = match direction {
            Direction::DefToTerm => (text.to_string(), target.definition.clone()),
            Direction::TermToDef => (target.term.clone(), text.to_string()),
        };
        Self {
            id: format!("ai-distractor-{}", index),
            term,
            definition,
            label: text.to_string(),
            is_distractor: true,
        }
    }
}

/// One answered quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub term: String,
    pub definition: String,
    pub question_type: Direction,
    pub answered_correctly: bool,
    pub user_answer_label: String,
}
