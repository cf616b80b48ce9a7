use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use litrev_core::secrets::EnvCredentialStore;
use litrev_llm::{AdapterRegistry, Orchestrator, ProviderRegistry, RetryPolicy};
use litrev_review::{reviewed_papers_list, summarize_pdfs, BatchOptions, ReviewEngine};

/// Generate a literature review from a directory of academic PDFs.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing the PDF files to review
    #[arg(long, default_value = "papers")]
    pdf_dir: PathBuf,

    /// Maximum characters of each paper sent to the model
    #[arg(long, default_value_t = 6000)]
    individual_summary_length: usize,

    /// Word limit for the final synthesized review
    #[arg(long, default_value_t = 2500)]
    final_review_length: usize,

    /// Providers to try first, in order (e.g. --provider-order anthropic openai)
    #[arg(long, num_args = 1..)]
    provider_order: Vec<String>,

    /// Only process the first N PDFs found
    #[arg(long)]
    max_files: Option<usize>,

    /// Path to a providers catalog file (defaults to the built-in catalog)
    #[arg(long)]
    providers_config: Option<PathBuf>,

    /// How many papers to summarize in parallel
    #[arg(long, default_value_t = 4)]
    concurrency: usize,
}

fn init_tracing() {
    let log_format = std::env::var("LITREV_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

fn collect_pdfs(dir: &PathBuf, max_files: Option<usize>) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading PDF directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    if let Some(limit) = max_files {
        files.truncate(limit);
    }
    Ok(files)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let registry = match &cli.providers_config {
        Some(path) => ProviderRegistry::from_path(path),
        None => ProviderRegistry::embedded_default(),
    };
    let adapters = AdapterRegistry::standard(reqwest::Client::new());
    let orchestrator = Orchestrator::new(registry, adapters, Arc::new(EnvCredentialStore));

    let preference = if cli.provider_order.is_empty() {
        None
    } else {
        Some(cli.provider_order.clone())
    };
    let engine = ReviewEngine::new(Arc::new(orchestrator))
        .with_retry_policy(RetryPolicy::default())
        .with_preference(preference);

    let files = collect_pdfs(&cli.pdf_dir, cli.max_files)?;
    if files.is_empty() {
        bail!("No PDF files found in {}", cli.pdf_dir.display());
    }
    tracing::info!("Found {} PDF files to process", files.len());

    let options = BatchOptions {
        concurrency: cli.concurrency,
        text_limit: cli.individual_summary_length,
    };
    let summaries = summarize_pdfs(&engine, &files, &options).await;
    if summaries.is_empty() {
        bail!("No paper summaries could be generated; check API keys and logs");
    }
    tracing::info!("Summarized {} of {} papers", summaries.len(), files.len());

    let mut review = engine
        .synthesize_review(&summaries, cli.final_review_length)
        .await
        .context("generating the literature review")?;
    review.push_str("\n\n");
    review.push_str(&reviewed_papers_list(&summaries));

    let filename = format!(
        "literature_review_{}.md",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    tokio::fs::write(&filename, &review)
        .await
        .with_context(|| format!("writing {filename}"))?;
    tracing::info!("Literature review saved to {filename}");
    println!("Literature review saved to {filename}");

    Ok(())
}
