//! Multiple-choice quiz with optional AI-written distractors.
//!
//! The drill performs no IO. When it needs the completion endpoint it hands
//! back a [`QuizEffect`]; the caller runs the request and feeds the reply to
//! [`QuizDrill::resolve_distractors`] or [`QuizDrill::resolve_summary`].

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use std::time::Duration;

use super::{Drill, DrillKind};
use crate::error::QuizError;
use crate::timer::Timers;
use crate::types::{Card, Direction, HistoryEntry, QuizOption};

/// Cards needed when distractors come from the deck.
pub const MIN_STANDARD_CARDS: usize = 4;

/// Wrong answers per question.
pub const DISTRACTOR_COUNT: usize = 3;

/// Delay before the next question after a correct answer.
pub const CORRECT_ADVANCE_DELAY: Duration = Duration::from_secs(1);

/// Seconds counted down after a wrong answer.
pub const WRONG_COUNTDOWN_SECS: u8 = 3;

const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

pub const AI_FALLBACK_ADVISORY: &str = "AI failed, falling back to deck.";
pub const EMPTY_SUMMARY: &str = "No questions answered yet!";
pub const SUMMARY_FAILED: &str = "Failed to generate AI summary. Ensure your API Key is set.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuizSettings {
    pub ai_distractors: bool,
    pub direction: Direction,
    pub auto_advance: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// No question generated yet.
    Idle,
    /// Waiting for AI distractors.
    Generating,
    Question,
    Feedback,
}

/// The end-of-session summary overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryView {
    Hidden,
    Loading,
    Ready(String),
}

/// Inputs for an AI distractor request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistractorRequest {
    pub term: String,
    pub definition: String,
    pub direction: Direction,
}

impl DistractorRequest {
    pub fn user_prompt(&self) -> String {
        format!("Term: {}\nDefinition: {}", self.term, self.definition)
    }
}

/// Inputs for an AI session summary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub report: String,
}

/// Work the caller must perform on the drill's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEffect {
    FetchDistractors(DistractorRequest),
    FetchSummary(SummaryRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuizEvent {
    NextQuestion,
    CountdownTick,
}

#[derive(Debug, Clone)]
struct Question {
    target: Card,
    direction: Direction,
}

#[derive(Debug)]
pub struct QuizDrill {
    cards: Vec<Card>,
    settings: QuizSettings,
    phase: QuizPhase,
    question: Option<Question>,
    options: Vec<QuizOption>,
    selected: Option<String>,
    correct_count: u32,
    wrong_count: u32,
    history: Vec<HistoryEntry>,
    summary: SummaryView,
    advisory: Option<String>,
    countdown: Option<u8>,
    timers: Timers<QuizEvent>,
}

impl QuizDrill {
    pub fn new(cards: &[Card], settings: QuizSettings) -> Self {
        Self {
            cards: cards.to_vec(),
            settings,
            phase: QuizPhase::Idle,
            question: None,
            options: Vec::new(),
            selected: None,
            correct_count: 0,
            wrong_count: 0,
            history: Vec::new(),
            summary: SummaryView::Hidden,
            advisory: None,
            countdown: None,
            timers: Timers::new(),
        }
    }

    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    pub fn set_ai_distractors(&mut self, enabled: bool) {
        self.settings.ai_distractors = enabled;
    }

    pub fn set_auto_advance(&mut self, enabled: bool) {
        self.settings.auto_advance = enabled;
    }

    /// Swap which side is asked from the next question on. Score and
    /// history are kept.
    pub fn toggle_direction(&mut self) {
        self.settings.direction = self.settings.direction.toggled();
    }

    fn required_cards(&self) -> usize {
        if self.settings.ai_distractors {
            1
        } else {
            MIN_STANDARD_CARDS
        }
    }

    pub fn is_playable(&self) -> bool {
        self.cards.len() >= self.required_cards()
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn target(&self) -> Option<&Card> {
        self.question.as_ref().map(|q| &q.target)
    }

    /// Question text for the current target.
    pub fn prompt(&self) -> Option<&str> {
        self.question.as_ref().map(|q| q.direction.prompt(&q.target))
    }

    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<&QuizOption> {
        let id = self.selected.as_ref()?;
        self.options.iter().find(|o| &o.id == id)
    }

    pub fn is_correct_option(&self, option: &QuizOption) -> bool {
        match &self.question {
            Some(q) => option.id == q.target.id && !option.is_distractor,
            None => false,
        }
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn summary(&self) -> &SummaryView {
        &self.summary
    }

    /// Non-fatal notice for the current question.
    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    /// Seconds left before auto-advancing after a wrong answer.
    pub fn countdown(&self) -> Option<u8> {
        self.countdown
    }

    /// Pick a new target and build its options.
    ///
    /// With AI distractors enabled this returns a
    /// [`QuizEffect::FetchDistractors`] and the drill waits in
    /// [`QuizPhase::Generating`] until the reply is resolved.
    pub fn generate_question<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<QuizEffect>, QuizError> {
        if self.phase == QuizPhase::Generating {
            return Err(QuizError::RequestInFlight);
        }
        if !self.is_playable() {
            return Err(QuizError::NotEnoughCards {
                need: self.required_cards(),
                have: self.cards.len(),
            });
        }

        self.timers.cancel_all();
        self.countdown = None;
        self.selected = None;
        self.advisory = None;
        self.options.clear();

        let target = self.cards[rng.random_range(0..self.cards.len())].clone();
        let direction = self.settings.direction;
        self.question = Some(Question {
            target: target.clone(),
            direction,
        });

        if self.settings.ai_distractors {
            self.phase = QuizPhase::Generating;
            return Ok(Some(QuizEffect::FetchDistractors(DistractorRequest {
                term: target.term,
                definition: target.definition,
                direction,
            })));
        }

        self.options = self.standard_options(&target, direction, rng);
        self.phase = QuizPhase::Question;
        Ok(None)
    }

    /// Manual "next question", also used to skip the countdown.
    pub fn next_question<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<QuizEffect>, QuizError> {
        self.generate_question(rng)
    }

    /// Feed back the distractor reply, or the reason the request failed.
    ///
    /// Returns false if the drill was not waiting for distractors.
    pub fn resolve_distractors<R: Rng + ?Sized>(
        &mut self,
        reply: Result<String, String>,
        rng: &mut R,
    ) -> bool {
        if self.phase != QuizPhase::Generating {
            return false;
        }
        let Some(Question { target, direction }) = self.question.clone() else {
            return false;
        };

        self.options = match reply {
            Ok(text) => self.ai_options(&target, direction, &text, rng),
            Err(_) => {
                self.advisory = Some(AI_FALLBACK_ADVISORY.to_string());
                self.standard_options(&target, direction, rng)
            }
        };
        self.phase = QuizPhase::Question;
        true
    }

    fn standard_options<R: Rng + ?Sized>(
        &self,
        target: &Card,
        direction: Direction,
        rng: &mut R,
    ) -> Vec<QuizOption> {
        let mut options = vec![QuizOption::from_card(target, direction)];
        options.extend(
            self.cards
                .iter()
                .filter(|c| c.id != target.id)
                .choose_multiple(rng, DISTRACTOR_COUNT)
                .into_iter()
                .map(|c| QuizOption::from_card(c, direction)),
        );
        options.shuffle(rng);
        options
    }

    /// Options from an AI reply, topped up with real cards when the reply
    /// is short and the deck can spare them.
    ///
    /// Top-up options are real cards, so they are not flagged as
    /// distractors even though they are wrong answers.
    fn ai_options<R: Rng + ?Sized>(
        &self,
        target: &Card,
        direction: Direction,
        reply: &str,
        rng: &mut R,
    ) -> Vec<QuizOption> {
        let correct = QuizOption::from_card(target, direction);
        let mut wrong: Vec<QuizOption> = parse_distractor_reply(reply, &correct.label)
            .iter()
            .enumerate()
            .map(|(i, text)| QuizOption::synthesized(i, text, target, direction))
            .collect();

        let missing = DISTRACTOR_COUNT - wrong.len();
        if missing > 0 && self.cards.len() > DISTRACTOR_COUNT {
            wrong.extend(
                self.cards
                    .iter()
                    .filter(|c| c.id != target.id)
                    .choose_multiple(rng, missing)
                    .into_iter()
                    .map(|c| QuizOption::from_card(c, direction)),
            );
        }

        let mut options = vec![correct];
        options.extend(wrong);
        options.shuffle(rng);
        options
    }

    /// Answer the current question.
    ///
    /// Returns whether the answer was correct, or `None` when the click is
    /// ignored (no open question, feedback already shown, request in flight,
    /// summary open, unknown option).
    pub fn select_option(&mut self, option_id: &str) -> Option<bool> {
        if self.phase != QuizPhase::Question || self.summary != SummaryView::Hidden {
            return None;
        }
        let option = self.options.iter().find(|o| o.id == option_id)?.clone();
        let question = self.question.clone()?;

        let is_correct = self.is_correct_option(&option);
        self.selected = Some(option.id.clone());
        self.phase = QuizPhase::Feedback;

        if is_correct {
            self.correct_count += 1;
        } else {
            self.wrong_count += 1;
        }

        self.history.push(HistoryEntry {
            term: question.target.term,
            definition: question.target.definition,
            question_type: question.direction,
            answered_correctly: is_correct,
            user_answer_label: option.label,
        });

        if self.settings.auto_advance {
            if is_correct {
                self.timers
                    .schedule(CORRECT_ADVANCE_DELAY, QuizEvent::NextQuestion);
            } else {
                self.countdown = Some(WRONG_COUNTDOWN_SECS);
                self.timers.schedule(COUNTDOWN_TICK, QuizEvent::CountdownTick);
            }
        }

        Some(is_correct)
    }

    /// Move the drill's clock forward.
    ///
    /// The clock stands still while the summary is open, so closing it
    /// returns to exactly the state it covered.
    pub fn elapse<R: Rng + ?Sized>(&mut self, elapsed: Duration, rng: &mut R) -> Vec<QuizEffect> {
        let mut effects = Vec::new();
        if self.summary != SummaryView::Hidden {
            return effects;
        }

        let deadline = self.timers.deadline(elapsed);
        while let Some(event) = self.timers.pop_due(deadline) {
            let advance = match event {
                QuizEvent::NextQuestion => true,
                QuizEvent::CountdownTick => {
                    let left = self.countdown.unwrap_or(1).saturating_sub(1);
                    if left == 0 {
                        self.countdown = None;
                        true
                    } else {
                        self.countdown = Some(left);
                        self.timers.schedule(COUNTDOWN_TICK, QuizEvent::CountdownTick);
                        false
                    }
                }
            };
            if advance {
                if let Ok(Some(effect)) = self.generate_question(rng) {
                    effects.push(effect);
                }
            }
        }
        self.timers.settle(deadline);
        effects
    }

    /// Open the summary overlay.
    ///
    /// Returns a [`QuizEffect::FetchSummary`] unless the history is empty or
    /// a summary request is already running.
    pub fn finish_session(&mut self) -> Option<QuizEffect> {
        if self.summary == SummaryView::Loading {
            return None;
        }
        if self.history.is_empty() {
            self.summary = SummaryView::Ready(EMPTY_SUMMARY.to_string());
            return None;
        }
        self.summary = SummaryView::Loading;
        Some(QuizEffect::FetchSummary(SummaryRequest {
            report: self.session_report(),
        }))
    }

    /// One line per answered question, oldest first.
    pub fn session_report(&self) -> String {
        self.history
            .iter()
            .enumerate()
            .map(|(i, h)| {
                format!(
                    "Q{} [{}]: {} - {}",
                    i + 1,
                    h.question_type.as_str(),
                    h.term,
                    if h.answered_correctly { "CORRECT" } else { "WRONG" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn resolve_summary(&mut self, reply: Result<String, String>) {
        if self.summary != SummaryView::Loading {
            return;
        }
        let text = reply.unwrap_or_else(|_| SUMMARY_FAILED.to_string());
        self.summary = SummaryView::Ready(text);
    }

    /// Leave the summary overlay. Score and history are untouched.
    pub fn close_summary(&mut self) {
        self.summary = SummaryView::Hidden;
    }
}

impl Drill for QuizDrill {
    fn kind(&self) -> DrillKind {
        DrillKind::Quiz
    }

    fn time_until_next(&self) -> Option<Duration> {
        if self.summary != SummaryView::Hidden {
            return None;
        }
        self.timers.time_until_next()
    }
}

/// Split a `a | b | c` reply into at most [`DISTRACTOR_COUNT`] usable texts.
///
/// Blank entries and entries equal to the correct answer are dropped.
pub fn parse_distractor_reply(reply: &str, correct_label: &str) -> Vec<String> {
    reply
        .trim()
        .split('|')
        .map(str::trim)
        .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case(correct_label.trim()))
        .take(DISTRACTOR_COUNT)
        .map(str::to_string)
        .collect()
}
