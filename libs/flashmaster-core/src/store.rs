//! The active card set shared by every drill.

use crate::error::Result;
use crate::parser::parse;
use crate::types::Card;

/// Ordered cards for the current session.
///
/// `revision` changes every time the card set is replaced, so drills can tell
/// a new store apart from the same store observed twice.
#[derive(Debug, Clone, Default)]
pub struct CardStore {
    cards: Vec<Card>,
    revision: u64,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Parse `text` and replace the store with the result.
    ///
    /// On error the store is left untouched.
    pub fn load_text(&mut self, text: &str) -> Result<usize> {
        let cards = parse(text)?;
        let count = cards.len();
        self.replace(cards);
        Ok(count)
    }

    pub fn replace(&mut self, cards: Vec<Card>) {
        self.cards = cards;
        self.revision += 1;
    }

    /// Drop every card (the user went back to input).
    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn load_replaces_cards_and_bumps_revision() {
        let mut store = CardStore::new();
        assert_eq!(store.revision(), 0);

        let count = store
            .load_text("AES,Advanced Encryption Standard\nCIA,Confidentiality Integrity Availability")
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.cards()[0].term, "AES");
        assert_eq!(store.cards()[1].definition, "Confidentiality Integrity Availability");
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn failed_load_leaves_store_unchanged() {
        let mut store = CardStore::new();
        store.load_text("AES,Advanced Encryption Standard").unwrap();
        let before = store.cards().to_vec();

        let error = store.load_text("BadLineNoComma").unwrap_err();
        assert!(matches!(error, ParseError::MissingComma { line: 1, .. }));
        assert_eq!(store.cards(), before.as_slice());
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn clear_empties_store() {
        let mut store = CardStore::new();
        store.load_text("a,b").unwrap();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.revision(), 2);
    }
}
