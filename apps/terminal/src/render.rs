//! Plain-text views of the drills.

use flashmaster_core::{Card, FlashcardDrill, MatchDrill, MatchPhase, QuizDrill, QuizPhase, SummaryView};

pub const HELP: &str = "\
Input:
  load                 paste TERM,DEFINITION lines, end with a line containing only `.`
  extract              paste notes for AI extraction, end with `.`
  cards                list the loaded cards
  back                 discard the cards and return to input
  mode flash|quiz|match
  show                 redraw the current view
Flashcards: flip, next, prev, shuffle
Match:      pick <n>, reset
Quiz:       answer <A-D>, next, skip, dir, ai on|off, auto on|off, finish, close
  help, quit";

pub fn render_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "No cards loaded. Type `load` or `extract`.".to_string();
    }
    cards
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:>3}. {} = {}", i + 1, c.term, c.definition))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_flashcards(drill: &FlashcardDrill) -> String {
    let Some(card) = drill.current() else {
        return "No cards to study.".to_string();
    };
    let (position, len) = drill.progress();
    let face = if drill.is_flipped() {
        format!("  {}", card.definition)
    } else {
        format!("  {}\n  (flip to reveal)", card.term)
    };
    format!("Card {} / {}\n{}", position, len, face)
}

pub fn render_match(drill: &MatchDrill) -> String {
    match drill.phase() {
        MatchPhase::Unplayable => return "Need at least 2 cards to match.".to_string(),
        MatchPhase::Won => return "All Cleared! Type `reset` to play again.".to_string(),
        MatchPhase::Playing | MatchPhase::MismatchPause => {}
    }

    let mut lines = vec![format!(
        "Matched {} / {}",
        drill.matched_count(),
        drill.pair_count()
    )];
    for (i, tile) in drill.tiles().iter().enumerate() {
        let marker = if drill.is_matched(tile) {
            '='
        } else if drill.is_error(tile) {
            '!'
        } else if drill.is_selected(tile) {
            '*'
        } else {
            ' '
        };
        lines.push(format!("{}[{:>2}] {}", marker, i + 1, tile.content));
    }
    lines.join("\n")
}

pub fn render_quiz(drill: &QuizDrill) -> String {
    if let Some(view) = render_summary(drill) {
        return view;
    }
    if !drill.is_playable() {
        return "Not enough cards.".to_string();
    }

    let settings = drill.settings();
    let mut lines = vec![format!(
        "Correct: {}  Wrong: {}  [{}]  AI distractors: {}  Auto next: {}",
        drill.correct_count(),
        drill.wrong_count(),
        settings.direction.as_str(),
        on_off(settings.ai_distractors),
        on_off(settings.auto_advance),
    )];

    if let Some(advisory) = drill.advisory() {
        lines.push(format!("! {}", advisory));
    }

    match drill.phase() {
        QuizPhase::Idle => {
            lines.push("Loading...".to_string());
            return lines.join("\n");
        }
        QuizPhase::Generating => {
            lines.push(drill.prompt().unwrap_or_default().to_string());
            lines.push("Generating strict distractors...".to_string());
            return lines.join("\n");
        }
        QuizPhase::Question | QuizPhase::Feedback => {}
    }

    lines.push(String::new());
    lines.push(drill.prompt().unwrap_or_default().to_string());
    lines.push(String::new());

    let feedback = drill.phase() == QuizPhase::Feedback;
    let selected_id = drill.selected().map(|o| o.id.clone());
    for (i, option) in drill.options().iter().enumerate() {
        let letter = (b'A' + i as u8) as char;
        let mark = if feedback && drill.is_correct_option(option) {
            "  [correct]"
        } else if feedback && selected_id.as_deref() == Some(option.id.as_str()) {
            "  [wrong]"
        } else {
            ""
        };
        lines.push(format!("  {}. {}{}", letter, option.label, mark));
    }

    if feedback {
        lines.push(String::new());
        match drill.countdown() {
            Some(secs) => lines.push(format!("Next question in {}... (type `skip`)", secs)),
            None if settings.auto_advance => lines.push("Next (Auto)".to_string()),
            None => lines.push("Type `next` for the next question.".to_string()),
        }
    }
    lines.join("\n")
}

fn render_summary(drill: &QuizDrill) -> Option<String> {
    let body = match drill.summary() {
        SummaryView::Hidden => return None,
        SummaryView::Loading => "Analyzing your performance...".to_string(),
        SummaryView::Ready(text) => text.clone(),
    };
    Some(format!(
        "AI Session Summary\nCorrect: {}  Wrong: {}  Total: {}\n\n{}\n\n(type `close` to return to the quiz)",
        drill.correct_count(),
        drill.wrong_count(),
        drill.history().len(),
        body
    ))
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
