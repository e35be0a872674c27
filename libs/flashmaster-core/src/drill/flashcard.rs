//! Flip-through flashcards.

use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

use super::{Drill, DrillKind};
use crate::timer::Timers;
use crate::types::Card;

/// Delay between flipping a card face down and moving to the next one.
pub const FLIP_DELAY: Duration = Duration::from_millis(200);

/// Direction of a move through the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Backward,
}

impl Step {
    fn offset(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

#[derive(Debug)]
pub struct FlashcardDrill {
    deck: Vec<Card>,
    position: usize,
    is_flipped: bool,
    timers: Timers<Step>,
}

impl FlashcardDrill {
    pub fn new(cards: &[Card]) -> Self {
        Self {
            deck: cards.to_vec(),
            position: 0,
            is_flipped: false,
            timers: Timers::new(),
        }
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub fn current(&self) -> Option<&Card> {
        self.deck.get(self.position)
    }

    /// 1-based position and deck size, for "Card n / len".
    pub fn progress(&self) -> (usize, usize) {
        if self.deck.is_empty() {
            (0, 0)
        } else {
            (self.position + 1, self.deck.len())
        }
    }

    pub fn toggle_flip(&mut self) {
        self.is_flipped = !self.is_flipped;
    }

    /// Turn the card face down, then move once the flip-back finishes.
    ///
    /// Moves requested in quick succession each apply.
    pub fn advance(&mut self, step: Step) {
        if self.deck.is_empty() {
            return;
        }
        self.is_flipped = false;
        self.timers.schedule(FLIP_DELAY, step);
    }

    /// Reorder the deck uniformly at random and start over face down.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.timers.cancel_all();
        self.deck.shuffle(rng);
        self.position = 0;
        self.is_flipped = false;
    }

    /// Move the drill's clock forward, applying any moves that come due.
    pub fn elapse(&mut self, elapsed: Duration) {
        let deadline = self.timers.deadline(elapsed);
        while let Some(step) = self.timers.pop_due(deadline) {
            self.apply(step);
        }
        self.timers.settle(deadline);
    }

    fn apply(&mut self, step: Step) {
        let len = self.deck.len() as isize;
        if len == 0 {
            return;
        }
        self.position = (self.position as isize + step.offset() + len).rem_euclid(len) as usize;
    }
}

impl Drill for FlashcardDrill {
    fn kind(&self) -> DrillKind {
        DrillKind::Flashcards
    }

    fn time_until_next(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn deck(n: usize) -> Vec<Card> {
        let text = (0..n)
            .map(|i| format!("term{},definition{}", i, i))
            .collect::<Vec<_>>()
            .join("\n");
        parse(&text).unwrap()
    }

    #[test]
    fn advance_flips_down_immediately_and_moves_after_delay() {
        let mut drill = FlashcardDrill::new(&deck(3));
        drill.toggle_flip();
        assert!(drill.is_flipped());

        drill.advance(Step::Forward);
        assert!(!drill.is_flipped());
        assert_eq!(drill.position(), 0);
        assert_eq!(drill.time_until_next(), Some(FLIP_DELAY));

        drill.elapse(Duration::from_millis(199));
        assert_eq!(drill.position(), 0);

        drill.elapse(Duration::from_millis(1));
        assert_eq!(drill.position(), 1);
        assert_eq!(drill.time_until_next(), None);
    }

    #[test]
    fn backward_wraps_to_last_card() {
        let mut drill = FlashcardDrill::new(&deck(4));
        drill.advance(Step::Backward);
        drill.elapse(FLIP_DELAY);
        assert_eq!(drill.position(), 3);
        assert_eq!(drill.progress(), (4, 4));
    }

    #[test]
    fn full_lap_returns_to_start() {
        for len in 1..6 {
            let mut drill = FlashcardDrill::new(&deck(len));
            drill.advance(Step::Forward);
            drill.elapse(FLIP_DELAY);
            let start = drill.position();
            for _ in 0..len {
                drill.advance(Step::Forward);
                drill.elapse(FLIP_DELAY);
            }
            assert_eq!(drill.position(), start);
        }
    }

    #[test]
    fn queued_moves_all_apply() {
        let mut drill = FlashcardDrill::new(&deck(5));
        drill.advance(Step::Forward);
        drill.advance(Step::Forward);
        drill.elapse(Duration::from_secs(1));
        assert_eq!(drill.position(), 2);
    }

    #[test]
    fn shuffle_resets_and_cancels_pending_moves() {
        let cards = deck(10);
        let mut drill = FlashcardDrill::new(&cards);
        drill.advance(Step::Forward);
        drill.elapse(FLIP_DELAY);
        drill.toggle_flip();
        drill.advance(Step::Forward);

        let mut rng = StdRng::seed_from_u64(7);
        drill.shuffle(&mut rng);
        drill.elapse(Duration::from_secs(1));

        assert_eq!(drill.position(), 0);
        assert!(!drill.is_flipped());
        assert_eq!(drill.len(), cards.len());
        let mut ids: Vec<_> = drill.deck().iter().map(|c| c.id.clone()).collect();
        let mut expected: Vec<_> = cards.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn same_seed_gives_same_order() {
        let cards = deck(8);
        let mut a = FlashcardDrill::new(&cards);
        let mut b = FlashcardDrill::new(&cards);
        a.shuffle(&mut StdRng::seed_from_u64(42));
        b.shuffle(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.deck(), b.deck());
    }

    #[test]
    fn empty_deck_is_inert() {
        let mut drill = FlashcardDrill::new(&[]);
        drill.advance(Step::Forward);
        drill.elapse(Duration::from_secs(1));
        assert!(drill.current().is_none());
        assert_eq!(drill.progress(), (0, 0));
        assert_eq!(drill.time_until_next(), None);
    }
}
