//! Litrev Review - the literature review pipeline.
//!
//! Takes a folder of PDF papers through extraction, per-paper structured
//! summarization (via the fallback orchestrator in `litrev-llm`), APA
//! citation formatting, and synthesis into one review document.
//!
//! # Architecture
//!
//! - `pdf`: text extraction from PDF files
//! - `summary`: the structured paper summary schema and its parsing
//! - `engine`: prompt building + orchestrator calls for summarize/synthesize
//! - `citation`: APA-7 citation and reviewed-paper list formatting
//! - `batch`: bounded concurrent fan-out over many papers

pub mod batch;
pub mod citation;
pub mod engine;
pub mod error;
pub mod pdf;
pub mod summary;

// Re-export main types for convenience
pub use batch::{summarize_pdfs, BatchOptions};
pub use citation::{apa_citation, reviewed_papers_list};
pub use engine::ReviewEngine;
pub use error::ReviewError;
pub use summary::PaperSummary;
