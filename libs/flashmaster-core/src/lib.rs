//! Core study library behind the FlashMaster front-ends.
//!
//! Provides:
//! - `TERM,DEFINITION` text parser and the card store
//! - Virtual timers for delayed transitions
//! - Flashcard, match and quiz drill state machines
//! - Shared types (Card, Tile, QuizOption, HistoryEntry, etc.)
//!
//! Nothing here performs IO. Randomness is always passed in, so a seeded
//! generator makes every shuffle reproducible.

pub mod drill;
pub mod error;
pub mod parser;
pub mod store;
pub mod timer;
pub mod types;

pub use drill::flashcard::{FlashcardDrill, Step};
pub use drill::matching::{MatchDrill, MatchPhase, SelectOutcome};
pub use drill::quiz::{
    DistractorRequest, QuizDrill, QuizEffect, QuizPhase, QuizSettings, SummaryRequest, SummaryView,
};
pub use drill::{Drill, DrillKind};
pub use error::{ParseError, QuizError, Result};
pub use parser::{format_cards, parse};
pub use store::CardStore;
pub use timer::{TimerHandle, Timers};
pub use types::{Card, Direction, HistoryEntry, QuizOption, Tile, TileKind};
