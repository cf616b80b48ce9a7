//! The structured paper summary schema.

use log::warn;
use serde::{Deserialize, Serialize};

use litrev_core::text::strip_code_fence;

use crate::error::ReviewError;

/// Structured summary of one academic paper, as produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSummary {
    pub title: String,
    pub authors: Vec<String>,
    pub year: i32,
    pub research_question: String,
    pub theoretical_framework: String,
    pub methodology: String,
    pub main_arguments: Vec<String>,
    pub findings: String,
    pub significance: String,
    pub limitations: String,
    pub future_research: String,
}

impl PaperSummary {
    /// Parse a summary from model output.
    ///
    /// Tries the fence-stripped content first; models occasionally wrap the
    /// JSON in markdown despite being told not to. Falls back to the raw
    /// content before giving up.
    pub fn parse(content: &str) -> Result<Self, ReviewError> {
        let cleaned = strip_code_fence(content);
        match serde_json::from_str(cleaned) {
            Ok(summary) => Ok(summary),
            Err(first) => {
                warn!("Error parsing cleaned JSON: {}", first);
                serde_json::from_str(content).map_err(|e| {
                    ReviewError::ParseSummary(format!("{} (cleaned attempt: {})", e, first))
                })
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_fixtures::summary_json;
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let summary = PaperSummary::parse(&summary_json()).unwrap();
        assert_eq!(summary.title, "Attention Is All You Need");
        assert_eq!(summary.year, 2017);
        assert_eq!(summary.authors.len(), 2);
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("```json\n{}\n```", summary_json());
        let summary = PaperSummary::parse(&fenced).unwrap();
        assert_eq!(summary.year, 2017);
    }

    #[test]
    fn test_parse_garbage_fails() {
        let err = PaperSummary::parse("I could not read this paper, sorry.").unwrap_err();
        assert!(matches!(err, ReviewError::ParseSummary(_)));
    }

    #[test]
    fn test_serde_roundtrip() {
        let summary = PaperSummary::parse(&summary_json()).unwrap();
        let reparsed =
            PaperSummary::parse(&serde_json::to_string(&summary).unwrap()).unwrap();
        assert_eq!(summary, reparsed);
    }
}
