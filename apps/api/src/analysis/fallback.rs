//! Templated substitute analysis for responses that carry no score marker.
//!
//! When the model answers successfully but ignores the output format, the
//! service can (opt-in via `ENABLE_FALLBACK_ANALYSIS`) return a generic
//! analysis instead of raw model chatter. The substitute is always
//! disclosed: handlers set `degraded: true` on the response whenever this
//! path produced the output. Selection is deterministic — keyed on the
//! unusable response text — so the same input yields the same substitute.

use crate::report::SCORE_MARKER;

/// Placeholder score attached to every synthesized analysis.
pub const FALLBACK_SCORE: u32 = 65;

const BULLETS_PER_SECTION: usize = 3;

const GENERIC_ISSUES: [&str; 6] = [
    "Section headings may not follow the standard names ATS parsers expect",
    "Key skills are not repeated in the context of work experience",
    "Dense formatting can prevent parsers from separating roles cleanly",
    "Dates are not presented in a single consistent format",
    "The summary section does not front-load role-relevant keywords",
    "Contact details may be embedded in a header that parsers skip",
];

const GENERIC_SUGGESTIONS: [&str; 6] = [
    "Rename custom headings to standard ones such as Experience, Skills, Education",
    "Mirror the exact keywords from the job description in your skills section",
    "Use a single-column layout with plain bullet points",
    "Format every date range as 'Mon YYYY - Mon YYYY'",
    "Open with a two-line summary naming the target role and core skills",
    "Move contact details into the document body, outside headers and footers",
];

/// True when a successful response cannot be scored, i.e. the literal
/// score marker is absent.
pub fn needs_fallback(response: &str) -> bool {
    !response.contains(SCORE_MARKER)
}

/// Renders a substitute analysis in the canonical marker format, with
/// three issues and three suggestions drawn without replacement from the
/// generic pools.
pub fn synthesize_analysis(response: &str) -> String {
    let offset = seed(response) as usize;
    let mut out = format!("{SCORE_MARKER} {FALLBACK_SCORE}\nFeedback:\n");
    for i in 0..BULLETS_PER_SECTION {
        out.push_str("- ");
        out.push_str(GENERIC_ISSUES[(offset + i) % GENERIC_ISSUES.len()]);
        out.push('\n');
    }
    out.push_str("Suggestions:\n");
    for i in 0..BULLETS_PER_SECTION {
        out.push_str("- ");
        out.push_str(GENERIC_SUGGESTIONS[(offset + i) % GENERIC_SUGGESTIONS.len()]);
        out.push('\n');
    }
    out
}

// FNV-1a over the response text; pool rotation only, not cryptographic.
fn seed(text: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in text.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::parse_analysis;

    #[test]
    fn test_detects_missing_score_marker() {
        assert!(needs_fallback("I cannot analyze this document."));
        assert!(!needs_fallback("ATS Compliance Score: 70\nFeedback:\n- x"));
    }

    #[test]
    fn test_synthesized_analysis_parses_cleanly() {
        let parsed = parse_analysis(&synthesize_analysis("unusable output"));
        assert_eq!(parsed.score, Some(FALLBACK_SCORE));
        assert_eq!(parsed.feedback.len(), 3);
        assert_eq!(parsed.suggestions.len(), 3);
    }

    #[test]
    fn test_selection_is_deterministic() {
        assert_eq!(
            synthesize_analysis("same input"),
            synthesize_analysis("same input")
        );
    }

    #[test]
    fn test_bullets_are_distinct_within_a_section() {
        let parsed = parse_analysis(&synthesize_analysis("anything"));
        let mut feedback = parsed.feedback.clone();
        feedback.dedup();
        assert_eq!(feedback.len(), 3);
        let mut suggestions = parsed.suggestions.clone();
        suggestions.dedup();
        assert_eq!(suggestions.len(), 3);
    }
}
