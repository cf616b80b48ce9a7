//! Review pipeline error types.

use thiserror::Error;

use litrev_llm::LlmError;

/// Errors from the review pipeline.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// PDF extraction failed for a file.
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// Model output could not be parsed into a paper summary.
    #[error("Could not parse paper summary: {0}")]
    ParseSummary(String),

    /// The fallback orchestrator gave up.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReviewError {
    /// Create a new PDF extraction error.
    pub fn pdf(msg: impl Into<String>) -> Self {
        Self::Pdf(msg.into())
    }
}
