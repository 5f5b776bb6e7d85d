//! Text Extractor — turns an uploaded PDF into cleaned plain text.
//!
//! Parsing is delegated to `pdf-extract`; this module's own contract is
//! whitespace normalization and error containment. A document that cannot
//! be parsed yields [`ExtractError::Unreadable`] — the raw parser error
//! never crosses this boundary. Extraction operates on a complete byte
//! buffer (multipart delivers whole bodies), so there is no stream cursor
//! to rewind.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document could not be read as a PDF: {0}")]
    Unreadable(String),
}

/// Extracts and normalizes the text content of a PDF.
///
/// Pages with no extractable text contribute nothing; that is not an
/// error. Returns the whole document's text with every whitespace run
/// collapsed to a single space and the ends trimmed.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::Unreadable(e.to_string()))?;
    let cleaned = normalize_whitespace(&raw);
    debug!(
        raw_len = raw.len(),
        cleaned_len = cleaned.len(),
        "extracted text from PDF"
    );
    Ok(cleaned)
}

/// Collapses every run of whitespace (spaces, tabs, newlines) to a single
/// space and trims leading/trailing whitespace.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_runs_and_trims() {
        assert_eq!(normalize_whitespace("Hello\n\n   World\t\t!"), "Hello World !");
        assert_eq!(normalize_whitespace("  a  b  "), "a b");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \n\t "), "");
    }

    #[test]
    fn test_extract_rejects_non_pdf_bytes() {
        let err = extract_text(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Unreadable(_)));
    }

    #[test]
    fn test_extract_rejects_empty_input() {
        assert!(extract_text(b"").is_err());
    }

    #[test]
    fn test_extract_rejects_truncated_pdf_header() {
        // Valid magic bytes, garbage structure.
        let err = extract_text(b"%PDF-1.7\ngarbage").unwrap_err();
        assert!(matches!(err, ExtractError::Unreadable(_)));
    }
}
