//! Concurrent summarization of a set of PDF files.

use std::path::PathBuf;

use futures::stream::{self, StreamExt};
use log::{error, info};

use crate::engine::ReviewEngine;
use crate::pdf::extract_text_async;
use crate::summary::PaperSummary;

/// Options for a batch summarization run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// How many papers are summarized in parallel.
    pub concurrency: usize,
    /// Maximum characters of each paper sent to the model.
    pub text_limit: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            text_limit: 6000,
        }
    }
}

/// Extract and summarize every PDF in `files`.
///
/// Files that fail extraction or summarization are logged and skipped, so the
/// returned list can be shorter than the input.
pub async fn summarize_pdfs(
    engine: &ReviewEngine,
    files: &[PathBuf],
    options: &BatchOptions,
) -> Vec<PaperSummary> {
    let concurrency = options.concurrency.max(1);
    let results: Vec<Option<PaperSummary>> = stream::iter(files.iter().cloned())
        .map(|path| async move {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            info!("Processing {filename}");
            let text = match extract_text_async(path.clone()).await {
                Ok(text) => text,
                Err(e) => {
                    error!("Error extracting text from {filename}: {e}");
                    return None;
                }
            };
            match engine
                .summarize_paper(&text, &filename, options.text_limit)
                .await
            {
                Ok(summary) => Some(summary),
                Err(e) => {
                    error!("Error analyzing paper {filename}: {e}");
                    None
                }
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    results.into_iter().flatten().collect()
}
