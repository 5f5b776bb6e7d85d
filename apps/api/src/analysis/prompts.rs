//! Prompt constants for the ATS analysis call. The exact wording is not
//! load-bearing; the output-format contract (one score line, three feedback
//! bullets, three suggestion bullets) is — the report parser depends on it.

pub const ANALYSIS_PREAMBLE: &str = "\
Analyze the following CV text for ATS compliance.
Here are the ATS best practices:
- Use relevant keywords from the job description.
- Maintain clean and consistent formatting.
- Structure the CV with clear sections (e.g., Summary, Experience, Skills, Education).
- Avoid tables or images that may confuse ATS.
- Use standard section headings.";

pub const OUTPUT_FORMAT_INSTRUCTIONS: &str = "\
Respond in exactly this format:
ATS Compliance Score: <integer from 0 to 100>
Feedback:
- <first area for improvement>
- <second area for improvement>
- <third area for improvement>
Suggestions:
- <first concrete suggestion>
- <second concrete suggestion>
- <third concrete suggestion>";

/// Builds the full instruction prompt, embedding at most `char_budget`
/// characters of CV text. Truncation is lossy and deliberate: long CVs cost
/// latency and tokens without changing the shape of the answer.
pub fn build_prompt(cv_text: &str, char_budget: usize) -> String {
    let truncated = truncate_chars(cv_text, char_budget);
    format!("{ANALYSIS_PREAMBLE}\n\nCV Text:\n{truncated}\n\n{OUTPUT_FORMAT_INSTRUCTIONS}")
}

/// Truncates to a character count, not a byte count, so multi-byte text
/// never splits mid-character.
fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_text_and_format_contract() {
        let prompt = build_prompt("ten years of Rust", 4000);
        assert!(prompt.contains("ten years of Rust"));
        assert!(prompt.contains("ATS Compliance Score:"));
        assert!(prompt.contains("Feedback:"));
        assert!(prompt.contains("Suggestions:"));
    }

    #[test]
    fn test_truncation_keeps_only_the_prefix() {
        let text = "abcdefghij-THIS PART MUST BE DROPPED";
        let prompt = build_prompt(text, 10);
        assert!(prompt.contains("abcdefghij"));
        assert!(!prompt.contains("DROPPED"));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let text = "ééééé";
        assert_eq!(truncate_chars(text, 3), "ééé");
        assert_eq!(truncate_chars(text, 10), text);
    }
}
