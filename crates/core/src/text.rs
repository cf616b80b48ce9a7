//! Text cleaning helpers.
//!
//! Extracted PDF text arrives full of ligatures, control characters and
//! ragged whitespace; model output sometimes arrives wrapped in markdown
//! code fences. Both are normalized here before anything downstream sees them.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("valid regex"));

/// Clean and normalize text to handle special characters.
///
/// Non-ASCII characters are dropped (after folding a handful of common
/// typographic ones), control characters are removed, and runs of whitespace
/// collapse to a single space.
pub fn clean_text(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(fold_char)
        .filter(|c| *c == ' ' || !c.is_control())
        .filter(|c| c.is_ascii())
        .collect();
    WHITESPACE.replace_all(&folded, " ").trim().to_string()
}

/// Fold common typographic characters to their ASCII equivalents.
fn fold_char(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{201C}' | '\u{201D}' => '"',
        '\u{2013}' | '\u{2014}' => '-',
        '\u{00A0}' => ' ',
        '\n' | '\r' | '\t' => ' ',
        other => other,
    }
}

/// Unwrap a JSON payload from a markdown code fence, if present.
///
/// Models asked for raw JSON still occasionally reply with ```json blocks;
/// the content inside the first fence is returned, otherwise the input
/// unchanged.
pub fn strip_code_fence(content: &str) -> &str {
    match CODE_FENCE.captures(content) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(content).trim(),
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("a  b\n\nc\td"), "a b c d");
    }

    #[test]
    fn test_clean_text_folds_typographic_characters() {
        assert_eq!(clean_text("\u{201C}quoted\u{201D} \u{2014} done"), "\"quoted\" - done");
    }

    #[test]
    fn test_clean_text_drops_non_ascii() {
        assert_eq!(clean_text("caf\u{00E9} r\u{00E9}sum\u{00E9}"), "caf rsum");
    }

    #[test]
    fn test_strip_code_fence_json_block() {
        let wrapped = "```json\n{\"title\": \"A\"}\n```";
        assert_eq!(strip_code_fence(wrapped), "{\"title\": \"A\"}");
    }

    #[test]
    fn test_strip_code_fence_plain_block() {
        let wrapped = "```\n{\"title\": \"A\"}\n```";
        assert_eq!(strip_code_fence(wrapped), "{\"title\": \"A\"}");
    }

    #[test]
    fn test_strip_code_fence_passthrough() {
        let raw = "{\"title\": \"A\"}";
        assert_eq!(strip_code_fence(raw), raw);
    }
}
