//! Fixed system instructions for the three completion call sites.

use flashmaster_core::Direction;

pub const EXTRACT_CARDS: &str = "You are a helpful flashcard generator. extracting key terms and definitions from the user's text. Your output must be strictly in CSV format: TERM,DEFINITION. One per line. Do not include markdown code blocks, headers, or any other conversation. Do not number the lines.";

pub const DISTRACTOR_TERMS: &str = "You are a strict exam proctor. I will give you a Term and Definition. Generate 3 \"distractor\" TERMS that are WRONG but HIGHLY SIMILAR or confusingly related to the real term. They should test specific nuances or common misconceptions. Return ONLY the 3 terms separated by pipe symbol \"|\". No labeling.";

pub const DISTRACTOR_DEFINITIONS: &str = "You are a strict exam proctor. I will give you a Term and Definition. Generate 3 \"distractor\" DEFINITIONS that are WRONG but sound very bold and authoritative. They should use similar keywords but describe a different concept or be factually incorrect in a subtle way. Return ONLY the 3 definitions separated by pipe symbol \"|\". No labeling.";

pub const SESSION_SUMMARY: &str = "You are a friendly study tutor. Analyze the student's quiz session history. Identify 1) Calculate percentage score. 2) What topics they are strong in. 3) Specific weaknesses or confusion patterns (e.g. 'You keep confusing encryption types'). Give 3 actionable tips. Keep it concise.";

/// Instruction for the side of the card being asked for.
pub fn distractors_for(direction: Direction) -> &'static str {
    match direction {
        Direction::DefToTerm => DISTRACTOR_TERMS,
        Direction::TermToDef => DISTRACTOR_DEFINITIONS,
    }
}
