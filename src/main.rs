//! # Headline Digest
//!
//! Scrapes the front-page headlines of CNN and BBC, downloads every linked
//! article, asks an OpenAI-compatible LLM for one summary of all of them,
//! and writes the articles plus the summary to a CSV file.
//!
//! ## Usage
//!
//! ```sh
//! OPENAI_API_KEY=sk-... headline_digest
//! ```
//!
//! ## Architecture
//!
//! The application is a linear pipeline, run one request at a time:
//! 1. **Indexing**: Fetch each source's front page and extract headlines
//! 2. **Fetching**: Download each article and extract its body text
//! 3. **Summarizing**: Send all bodies to the LLM in a single request
//! 4. **Output**: Write `summary.txt` and `news_summary.csv`

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod api;
mod cli;
mod config;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod summarize;
#[cfg(test)]
mod test_support;
mod utils;

use api::OpenAiClient;
use cli::Cli;
use config::{FileConfig, load_config, resolve};
use fetch::HttpFetcher;
use summarize::Summarizer;
use utils::ensure_writable_parent;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("headline_digest starting up");

    if let Err(e) = dotenvy::dotenv() {
        debug!(error = %e, "No .env file loaded");
    }

    // Parse CLI after .env so its values can back the env-aware flags
    let args = Cli::parse();
    debug!(?args.output, ?args.summary_file, ?args.config, "Parsed CLI arguments");

    // ---- Load config ----
    let file_config = match &args.config {
        Some(path) => load_config(path).await?,
        None => FileConfig::default(),
    };
    let settings = match resolve(&args, file_config) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(
        sources = settings.sources.len(),
        model = %settings.llm.model,
        api_base = %settings.llm.api_base,
        "Configuration resolved"
    );

    // Early check: both output files must be writable before scraping starts
    for path in [&settings.output_path, &settings.summary_path] {
        if let Err(e) = ensure_writable_parent(path).await {
            error!(
                path = %path.display(),
                error = %e,
                "Output location is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Build clients ----
    let fetcher = HttpFetcher::new()?;
    let client = OpenAiClient::new(&settings.llm, &settings.api_key)?;
    let summarizer = Summarizer::new(client, &settings.llm, settings.summary_path.clone());

    // ---- Run ----
    let report = pipeline::run(
        &fetcher,
        &summarizer,
        &settings.sources,
        &settings.output_path,
    )
    .await?;

    if report.articles.is_empty() {
        warn!("No articles were collected; the summary is based on an empty prompt");
    }
    println!("\nGlobal news summary:\n{}", report.summary.text);

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        articles = report.articles.len(),
        tokens_used = report.summary.tokens_used,
        output = %settings.output_path.display(),
        summary_file = %summarizer.summary_path().display(),
        "Execution complete"
    );

    Ok(())
}
