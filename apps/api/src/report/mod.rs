//! Result Formatter — best-effort recovery of structure from model output.
//!
//! The remote model gives no structural guarantee, so its output is treated
//! as untrusted free text: the parser looks for the literal section markers
//! and degrades to empty fields when they are absent. It never errors — the
//! caller always has `raw` to fall back to.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const SCORE_MARKER: &str = "ATS Compliance Score:";
pub const FEEDBACK_MARKER: &str = "Feedback:";
pub const SUGGESTIONS_MARKER: &str = "Suggestions:";

/// The prompt asks for exactly three bullets per section; anything beyond
/// that is model chatter and is dropped.
const MAX_BULLETS: usize = 3;

// First run of digits after the (case-sensitive) score marker.
static SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ATS Compliance Score:[^0-9]*([0-9]+)").unwrap());

/// Structured view of one analysis response. `raw` always carries the
/// original text; the other fields are populated only when their markers
/// were found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedResult {
    pub score: Option<u32>,
    pub feedback: Vec<String>,
    pub suggestions: Vec<String>,
    pub raw: String,
}

/// Parses a raw analysis response. Pure and total: the same input always
/// yields the same result, and no input makes it fail.
pub fn parse_analysis(text: &str) -> ParsedResult {
    let score = SCORE_RE
        .captures(text)
        .and_then(|c| c[1].parse::<u32>().ok());
    let feedback = section_bullets(text, FEEDBACK_MARKER, Some(SUGGESTIONS_MARKER));
    let suggestions = section_bullets(text, SUGGESTIONS_MARKER, None);
    ParsedResult {
        score,
        feedback,
        suggestions,
        raw: text.to_string(),
    }
}

/// Collects `- ` bullet lines between `start` and `end` (or end of text).
/// A missing start marker yields an empty list, not an error.
fn section_bullets(text: &str, start: &str, end: Option<&str>) -> Vec<String> {
    let Some(idx) = text.find(start) else {
        return Vec::new();
    };
    let after = &text[idx + start.len()..];
    let section = match end.and_then(|marker| after.find(marker)) {
        Some(end_idx) => &after[..end_idx],
        None => after,
    };
    section
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("- "))
        .map(|rest| rest.trim().to_string())
        .filter(|rest| !rest.is_empty())
        .take(MAX_BULLETS)
        .collect()
}
