//! Parsing of interactive commands.

use flashmaster_core::DrillKind;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    /// Start capturing `TERM,DEFINITION` lines.
    Load,
    /// Start capturing notes for AI extraction.
    Extract,
    Cards,
    Back,
    Mode(DrillKind),
    Show,
    // Flashcards
    Flip,
    Next,
    Prev,
    Shuffle,
    // Match
    Pick(usize),
    Reset,
    // Quiz
    Answer(usize),
    Skip,
    Direction,
    AiDistractors(bool),
    AutoAdvance(bool),
    Finish,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0} (type `help`)")]
    Unknown(String),

    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("`{command}`: invalid argument {value:?}")]
    InvalidArgument { command: &'static str, value: String },
}

/// Line that ends a multi-line `load` or `extract` block.
pub const END_OF_INPUT: &str = ".";

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Show);
    };
    let arg = words.next();

    let command = match head.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "load" => Command::Load,
        "extract" => Command::Extract,
        "cards" => Command::Cards,
        "back" => Command::Back,
        "show" => Command::Show,
        "mode" => {
            let value = arg.ok_or(CommandError::MissingArgument {
                command: "mode",
                expected: "flash, quiz or match",
            })?;
            let kind = DrillKind::from_str(&value.to_ascii_lowercase()).ok_or_else(|| {
                CommandError::InvalidArgument {
                    command: "mode",
                    value: value.to_string(),
                }
            })?;
            Command::Mode(kind)
        }
        "flip" | "f" => Command::Flip,
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "shuffle" => Command::Shuffle,
        "pick" => Command::Pick(parse_number("pick", arg)?),
        "reset" => Command::Reset,
        "answer" | "a" => Command::Answer(parse_choice(arg)?),
        "skip" => Command::Skip,
        "dir" | "direction" => Command::Direction,
        "ai" => Command::AiDistractors(parse_toggle("ai", arg)?),
        "auto" => Command::AutoAdvance(parse_toggle("auto", arg)?),
        "finish" => Command::Finish,
        "close" => Command::Close,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

/// 1-based number to 0-based index.
fn parse_number(command: &'static str, arg: Option<&str>) -> Result<usize, CommandError> {
    let value = arg.ok_or(CommandError::MissingArgument {
        command,
        expected: "a number",
    })?;
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CommandError::InvalidArgument {
            command,
            value: value.to_string(),
        }),
    }
}

/// Option letter (A, B, ...) or 1-based number to 0-based index.
fn parse_choice(arg: Option<&str>) -> Result<usize, CommandError> {
    let value = arg.ok_or(CommandError::MissingArgument {
        command: "answer",
        expected: "an option letter",
    })?;
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Ok((c.to_ascii_uppercase() as u8 - b'A') as usize)
        }
        _ => parse_number("answer", Some(value)),
    }
}

fn parse_toggle(command: &'static str, arg: Option<&str>) -> Result<bool, CommandError> {
    match arg.map(|a| a.to_ascii_lowercase()).as_deref() {
        Some("on") | Some("true") | Some("yes") => Ok(true),
        Some("off") | Some("false") | Some("no") => Ok(false),
        Some(other) => Err(CommandError::InvalidArgument {
            command,
            value: other.to_string(),
        }),
        None => Err(CommandError::MissingArgument {
            command,
            expected: "on or off",
        }),
    }
}
