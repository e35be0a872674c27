//! Memory-match game: pair each term tile with its definition tile.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::time::Duration;

use super::{Drill, DrillKind};
use crate::store::CardStore;
use crate::timer::Timers;
use crate::types::{Card, Tile};

/// Cards dealt per game.
pub const DEAL_SIZE: usize = 7;

/// Cards needed before the game can be played.
pub const MIN_CARDS: usize = 2;

/// How long a mismatched pair stays face up.
pub const MISMATCH_PAUSE: Duration = Duration::from_secs(1);

/// Where the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Fewer than [`MIN_CARDS`] cards in the store.
    Unplayable,
    Playing,
    /// Two non-matching tiles are face up until the pause ends.
    MismatchPause,
    Won,
}

/// What a tile selection did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Ignored,
    /// First tile of a pair is face up.
    Pending,
    Matched,
    Mismatch,
    /// The match cleared the board.
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchEvent {
    ClearSelection,
}

#[derive(Debug)]
pub struct MatchDrill {
    cards: Vec<Card>,
    store_revision: Option<u64>,
    tiles: Vec<Tile>,
    selected: Vec<String>,
    matched: HashSet<String>,
    won: bool,
    timers: Timers<MatchEvent>,
}

impl MatchDrill {
    pub fn new<R: Rng + ?Sized>(store: &CardStore, rng: &mut R) -> Self {
        let mut drill = Self {
            cards: Vec::new(),
            store_revision: None,
            tiles: Vec::new(),
            selected: Vec::new(),
            matched: HashSet::new(),
            won: false,
            timers: Timers::new(),
        };
        drill.sync_store(store, rng);
        drill
    }

    /// Deal a new game if the store was replaced since the last deal.
    ///
    /// Returns true when a new game was dealt.
    pub fn sync_store<R: Rng + ?Sized>(&mut self, store: &CardStore, rng: &mut R) -> bool {
        if self.store_revision == Some(store.revision()) {
            return false;
        }
        self.store_revision = Some(store.revision());
        self.cards = store.cards().to_vec();
        self.init_game(rng);
        true
    }

    /// Shuffle the cards, deal up to [`DEAL_SIZE`] as tile pairs and shuffle
    /// the tiles.
    pub fn init_game<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.timers.cancel_all();
        self.selected.clear();
        self.matched.clear();
        self.won = false;
        self.tiles.clear();

        if !self.is_playable() {
            return;
        }

        let mut dealt = self.cards.clone();
        dealt.shuffle(rng);
        dealt.truncate(DEAL_SIZE);

        let mut tiles: Vec<Tile> = dealt.iter().flat_map(Tile::pair).collect();
        tiles.shuffle(rng);
        self.tiles = tiles;
    }

    pub fn is_playable(&self) -> bool {
        self.cards.len() >= MIN_CARDS
    }

    pub fn phase(&self) -> MatchPhase {
        if !self.is_playable() {
            MatchPhase::Unplayable
        } else if self.won {
            MatchPhase::Won
        } else if self.selected.len() == 2 {
            MatchPhase::MismatchPause
        } else {
            MatchPhase::Playing
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    /// Number of cards dealt into the current game.
    pub fn pair_count(&self) -> usize {
        self.tiles.len() / 2
    }

    pub fn is_selected(&self, tile: &Tile) -> bool {
        self.selected.iter().any(|id| *id == tile.id)
    }

    pub fn is_matched(&self, tile: &Tile) -> bool {
        self.matched.contains(&tile.card_id)
    }

    /// Whether a tile is part of a face-up mismatched pair.
    pub fn is_error(&self, tile: &Tile) -> bool {
        match self.selected_tiles().as_slice() {
            [first, second] => self.is_selected(tile) && first.card_id != second.card_id,
            _ => false,
        }
    }

    fn selected_tiles(&self) -> Vec<&Tile> {
        self.selected
            .iter()
            .filter_map(|id| self.tiles.iter().find(|t| t.id == *id))
            .collect()
    }

    pub fn select_tile(&mut self, tile_id: &str) -> SelectOutcome {
        if self.phase() != MatchPhase::Playing {
            return SelectOutcome::Ignored;
        }
        let Some(tile) = self.tiles.iter().find(|t| t.id == tile_id) else {
            return SelectOutcome::Ignored;
        };
        if self.is_matched(tile) || self.is_selected(tile) {
            return SelectOutcome::Ignored;
        }

        let card_id = tile.card_id.clone();
        self.selected.push(tile.id.clone());
        if self.selected.len() < 2 {
            return SelectOutcome::Pending;
        }

        let first_card = self
            .tiles
            .iter()
            .find(|t| t.id == self.selected[0])
            .map(|t| t.card_id.clone());

        if first_card.as_deref() == Some(card_id.as_str()) {
            self.matched.insert(card_id);
            self.selected.clear();
            if self.matched.len() == self.tiles.len() / 2 {
                self.won = true;
                return SelectOutcome::Won;
            }
            SelectOutcome::Matched
        } else {
            self.timers.schedule(MISMATCH_PAUSE, MatchEvent::ClearSelection);
            SelectOutcome::Mismatch
        }
    }

    /// Move the drill's clock forward, ending a mismatch pause when due.
    pub fn elapse(&mut self, elapsed: Duration) {
        let deadline = self.timers.deadline(elapsed);
        while let Some(event) = self.timers.pop_due(deadline) {
            match event {
                MatchEvent::ClearSelection => self.selected.clear(),
            }
        }
        self.timers.settle(deadline);
    }
}

impl Drill for MatchDrill {
    fn kind(&self) -> DrillKind {
        DrillKind::Match
    }

    fn time_until_next(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }
}
