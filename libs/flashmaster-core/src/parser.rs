//! Parser for `TERM,DEFINITION` card text.
//!
//! # Format
//! ```text
//! CIA Triad,Confidentiality Integrity Availability
//! AES,"Advanced Encryption Standard"
//! Two-Factor,Something you know, plus something you have
//! ```
//!
//! The first comma splits term from definition; later commas belong to the
//! definition. Blank lines are skipped.

use crate::error::{ParseError, Result};
use crate::types::Card;

/// Parse card text into cards, in input order.
///
/// Surrounding whitespace of the whole text is dropped before lines are
/// numbered, so the first non-blank line is line 1.
pub fn parse(content: &str) -> Result<Vec<Card>> {
    let mut cards = Vec::new();

    for (idx, line) in content.trim().lines().enumerate() {
        let line_num = idx + 1;
        match parse_line(line) {
            LineType::Blank => continue,
            LineType::NoComma => {
                return Err(ParseError::MissingComma {
                    line: line_num,
                    content: line.to_string(),
                })
            }
            LineType::Pair { term, definition } => {
                let card = Card::new(term, definition).ok_or_else(|| ParseError::EmptyField {
                    line: line_num,
                    content: line.to_string(),
                })?;
                cards.push(card);
            }
        }
    }

    if cards.is_empty() {
        return Err(ParseError::NoCards);
    }
    Ok(cards)
}

enum LineType<'a> {
    Blank,
    NoComma,
    Pair { term: &'a str, definition: &'a str },
}

fn parse_line(line: &str) -> LineType<'_> {
    if line.trim().is_empty() {
        return LineType::Blank;
    }
    match line.split_once(',') {
        Some((term, definition)) => LineType::Pair { term, definition },
        None => LineType::NoComma,
    }
}

/// Trim a field and strip one layer of matching `'` or `"` quotes.
pub fn clean_field(raw: &str) -> &str {
    strip_matching_quotes(raw.trim())
}

fn strip_matching_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Render cards back to `TERM,DEFINITION` lines.
///
/// Fields that would change under [`clean_field`] are wrapped in double
/// quotes, so parsing the output yields the same pairs. A term containing a
/// comma cannot be represented.
pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| format!("{},{}", quote_if_needed(&card.term), quote_if_needed(&card.definition)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote_if_needed(field: &str) -> String {
    if clean_field(field) == field {
        field.to_string()
    } else {
        format!("\"{}\"", field)
    }
}
