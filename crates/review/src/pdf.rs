//! PDF text extraction.

use std::path::{Path, PathBuf};

use litrev_core::text::clean_text;

use crate::error::ReviewError;

/// Extract and clean the text content of a PDF file.
pub fn extract_text(path: &Path) -> Result<String, ReviewError> {
    let raw = pdf_extract::extract_text(path)
        .map_err(|e| ReviewError::pdf(format!("{}: {}", path.display(), e)))?;
    Ok(clean_text(&raw))
}

/// Async wrapper: extraction is CPU-bound, so it runs on the blocking pool.
pub async fn extract_text_async(path: PathBuf) -> Result<String, ReviewError> {
    tokio::task::spawn_blocking(move || extract_text(&path))
        .await
        .map_err(|e| ReviewError::pdf(format!("extraction task failed: {}", e)))?
}
