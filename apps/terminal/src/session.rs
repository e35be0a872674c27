//! Interactive session state: the card store, the active view and the AI client.

use std::sync::Arc;
use std::time::Duration;

use flashmaster_core::{
    CardStore, Drill, DrillKind, FlashcardDrill, MatchDrill, QuizDrill, QuizEffect, QuizError,
    QuizPhase, QuizSettings, Step,
};
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::ai::{extract_cards, fetch_distractors, fetch_summary, CompletionClient, ExtractionLog};
use crate::command::Command;
use crate::render;

/// What the user is looking at.
///
/// Drills are rebuilt from the store each time they are entered, so leaving
/// a drill discards its progress.
pub enum View {
    Input,
    Flashcards(FlashcardDrill),
    Quiz(QuizDrill),
    Match(MatchDrill),
}

impl View {
    pub fn kind(&self) -> Option<DrillKind> {
        self.drill().map(|d| d.kind())
    }

    fn drill(&self) -> Option<&dyn Drill> {
        match self {
            View::Input => None,
            View::Flashcards(d) => Some(d),
            View::Quiz(d) => Some(d),
            View::Match(d) => Some(d),
        }
    }
}

pub struct Session {
    store: CardStore,
    view: View,
    rng: StdRng,
    client: Option<Arc<dyn CompletionClient>>,
    extraction_timeout: Duration,
}

impl Session {
    pub fn new(
        client: Option<Arc<dyn CompletionClient>>,
        extraction_timeout: Duration,
        rng: StdRng,
    ) -> Self {
        Self {
            store: CardStore::new(),
            view: View::Input,
            rng,
            client,
            extraction_timeout,
        }
    }

    pub fn store(&self) -> &CardStore {
        &self.store
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn ai_enabled(&self) -> bool {
        self.client.is_some()
    }

    pub fn time_until_next(&self) -> Option<Duration> {
        self.view.drill().and_then(|d| d.time_until_next())
    }

    pub fn render(&self) -> String {
        match &self.view {
            View::Input => "Type `load` to paste cards, `extract` to generate them from notes, or `help`.".to_string(),
            View::Flashcards(d) => render::render_flashcards(d),
            View::Quiz(d) => render::render_quiz(d),
            View::Match(d) => render::render_match(d),
        }
    }

    /// Replace the deck with manually entered `TERM,DEFINITION` text.
    pub fn load_cards(&mut self, text: &str) -> Vec<String> {
        match self.store.load_text(text) {
            Ok(count) => {
                info!(count, "cards loaded");
                self.view = View::Flashcards(FlashcardDrill::new(self.store.cards()));
                vec![format!("Loaded {} cards.", count), self.render()]
            }
            Err(e) => vec![format!("Error: {}", e)],
        }
    }

    /// Replace the deck with cards extracted from free-form notes.
    ///
    /// On failure the store and view are left as they were.
    pub async fn extract(&mut self, text: &str) -> Vec<String> {
        let mut log = ExtractionLog::new();
        let result = extract_cards(self.client.as_deref(), text, self.extraction_timeout, &mut log).await;

        let mut output: Vec<String> = log.entries().iter().map(|e| format!("  {}", e)).collect();
        match result {
            Ok(cards) => {
                let count = cards.len();
                self.store.replace(cards);
                self.view = View::Flashcards(FlashcardDrill::new(self.store.cards()));
                output.push(format!("Generated {} cards.", count));
                output.push(self.render());
            }
            Err(e) => output.push(format!("AI Generation Failed: {}", e)),
        }
        output
    }

    /// Apply one command. `Quit`, `Load` and `Extract` are handled by the
    /// input loop and produce nothing here.
    pub async fn execute(&mut self, command: Command) -> Vec<String> {
        match command {
            Command::Quit | Command::Load | Command::Extract => Vec::new(),
            Command::Help => vec![render::HELP.to_string()],
            Command::Show => vec![self.render()],
            Command::Cards => vec![render::render_cards(self.store.cards())],
            Command::Back => {
                self.store.clear();
                self.view = View::Input;
                vec!["Cards cleared.".to_string(), self.render()]
            }
            Command::Mode(kind) => self.enter(kind).await,

            Command::Flip | Command::Prev | Command::Shuffle => {
                let View::Flashcards(drill) = &mut self.view else {
                    return wrong_mode(DrillKind::Flashcards);
                };
                match command {
                    Command::Flip => drill.toggle_flip(),
                    Command::Prev => drill.advance(Step::Backward),
                    _ => drill.shuffle(&mut self.rng),
                }
                vec![self.render()]
            }

            Command::Next => match &mut self.view {
                View::Flashcards(drill) => {
                    drill.advance(Step::Forward);
                    vec![self.render()]
                }
                View::Quiz(_) => self.next_question().await,
                _ => vec!["`next` works in flashcards or quiz mode.".to_string()],
            },

            Command::Pick(index) => {
                let View::Match(drill) = &mut self.view else {
                    return wrong_mode(DrillKind::Match);
                };
                let Some(tile_id) = drill.tiles().get(index).map(|t| t.id.clone()) else {
                    return vec![format!("No tile {}.", index + 1)];
                };
                drill.select_tile(&tile_id);
                vec![self.render()]
            }
            Command::Reset => {
                let View::Match(drill) = &mut self.view else {
                    return wrong_mode(DrillKind::Match);
                };
                drill.init_game(&mut self.rng);
                vec![self.render()]
            }

            Command::Answer(index) => {
                let View::Quiz(drill) = &mut self.view else {
                    return wrong_mode(DrillKind::Quiz);
                };
                let Some(option_id) = drill.options().get(index).map(|o| o.id.clone()) else {
                    return vec![format!("No option {}.", option_name(index))];
                };
                if drill.select_option(&option_id).is_none() {
                    return vec!["Answer ignored.".to_string()];
                }
                vec![self.render()]
            }
            Command::Skip => {
                let View::Quiz(drill) = &self.view else {
                    return wrong_mode(DrillKind::Quiz);
                };
                if drill.phase() != QuizPhase::Feedback {
                    return vec!["Nothing to skip.".to_string()];
                }
                self.next_question().await
            }
            Command::Direction => {
                let View::Quiz(drill) = &mut self.view else {
                    return wrong_mode(DrillKind::Quiz);
                };
                drill.toggle_direction();
                vec![format!(
                    "Direction: {} (from the next question)",
                    drill.settings().direction.as_str()
                )]
            }
            Command::AiDistractors(enabled) => {
                let ai_enabled = self.ai_enabled();
                let View::Quiz(drill) = &mut self.view else {
                    return wrong_mode(DrillKind::Quiz);
                };
                drill.set_ai_distractors(enabled);
                let mut output = Vec::new();
                if enabled && !ai_enabled {
                    output.push("AI is disabled (no API key); questions will fall back to the deck.".to_string());
                }
                output.extend(self.start_quiz_if_idle().await);
                output.push(self.render());
                output
            }
            Command::AutoAdvance(enabled) => {
                let View::Quiz(drill) = &mut self.view else {
                    return wrong_mode(DrillKind::Quiz);
                };
                drill.set_auto_advance(enabled);
                vec![self.render()]
            }
            Command::Finish => {
                let View::Quiz(drill) = &mut self.view else {
                    return wrong_mode(DrillKind::Quiz);
                };
                if let Some(effect) = drill.finish_session() {
                    self.run_quiz_effect(effect).await;
                }
                vec![self.render()]
            }
            Command::Close => {
                let View::Quiz(drill) = &mut self.view else {
                    return wrong_mode(DrillKind::Quiz);
                };
                drill.close_summary();
                vec![self.render()]
            }
        }
    }

    /// Move the active drill's clock forward.
    ///
    /// Returns the redrawn view when anything visible changed.
    pub async fn elapse(&mut self, elapsed: Duration) -> Option<String> {
        let before = self.render();
        let effects = match &mut self.view {
            View::Input => Vec::new(),
            View::Flashcards(drill) => {
                drill.elapse(elapsed);
                Vec::new()
            }
            View::Match(drill) => {
                drill.elapse(elapsed);
                Vec::new()
            }
            View::Quiz(drill) => drill.elapse(elapsed, &mut self.rng),
        };
        for effect in effects {
            self.run_quiz_effect(effect).await;
        }
        let after = self.render();
        (after != before).then_some(after)
    }

    async fn enter(&mut self, kind: DrillKind) -> Vec<String> {
        if self.store.is_empty() {
            return vec!["No cards loaded. Type `load` or `extract` first.".to_string()];
        }
        if self.view.kind() == Some(kind) {
            return vec![self.render()];
        }

        info!(mode = kind.as_str(), "switching drill");
        let cards = self.store.cards();
        self.view = match kind {
            DrillKind::Flashcards => View::Flashcards(FlashcardDrill::new(cards)),
            DrillKind::Match => View::Match(MatchDrill::new(&self.store, &mut self.rng)),
            DrillKind::Quiz => View::Quiz(QuizDrill::new(cards, QuizSettings::default())),
        };

        let mut output = self.start_quiz_if_idle().await;
        output.push(self.render());
        output
    }

    /// Ask the first question once the quiz has enough cards for its settings.
    async fn start_quiz_if_idle(&mut self) -> Vec<String> {
        let View::Quiz(drill) = &mut self.view else {
            return Vec::new();
        };
        if drill.phase() != QuizPhase::Idle || !drill.is_playable() {
            return Vec::new();
        }
        match drill.generate_question(&mut self.rng) {
            Ok(Some(effect)) => {
                self.run_quiz_effect(effect).await;
                Vec::new()
            }
            Ok(None) => Vec::new(),
            Err(e) => vec![format!("Error: {}", e)],
        }
    }

    async fn next_question(&mut self) -> Vec<String> {
        let View::Quiz(drill) = &mut self.view else {
            return wrong_mode(DrillKind::Quiz);
        };
        match drill.next_question(&mut self.rng) {
            Ok(Some(effect)) => self.run_quiz_effect(effect).await,
            Ok(None) => {}
            Err(e @ QuizError::RequestInFlight) => return vec![format!("Error: {}", e)],
            Err(e) => return vec![format!("Error: {}", e), self.render()],
        }
        vec![self.render()]
    }

    async fn run_quiz_effect(&mut self, effect: QuizEffect) {
        let Self {
            view, rng, client, ..
        } = self;
        let View::Quiz(drill) = view else {
            return;
        };
        let client = client.as_deref();

        match effect {
            QuizEffect::FetchDistractors(request) => {
                let reply = fetch_distractors(client, &request).await.map_err(|e| {
                    warn!(error = %e, term = %request.term, "distractor request failed, using deck");
                    e.to_string()
                });
                drill.resolve_distractors(reply, rng);
            }
            QuizEffect::FetchSummary(request) => {
                let reply = fetch_summary(client, &request).await.map_err(|e| {
                    warn!(error = %e, "summary request failed");
                    e.to_string()
                });
                drill.resolve_summary(reply);
            }
        }
    }
}

/// Letter for the first 26 options, 1-based number beyond.
fn option_name(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}

fn wrong_mode(kind: DrillKind) -> Vec<String> {
    vec![format!(
        "That command needs {} mode. Type `mode {}`.",
        kind.as_str(),
        kind.as_str()
    )]
}
