//! End-to-end run: scrape, summarize, write.
//!
//! Every stage hands its result to the next as a return value. If the
//! summary cannot be produced, the scraped articles are still written to the
//! table (without a summary row) before the error is returned.

use crate::aggregate::collect_articles;
use crate::api::ChatClient;
use crate::fetch::PageFetcher;
use crate::models::{ArticleRecord, Source, Summary};
use crate::outputs::table::write_table;
use crate::summarize::Summarizer;
use std::error::Error;
use std::path::Path;
use tracing::{error, info, instrument};

/// Result of a successful run.
#[derive(Debug)]
pub struct RunReport {
    pub articles: Vec<ArticleRecord>,
    pub summary: Summary,
}

#[instrument(level = "info", skip_all, fields(output = %output_path.display()))]
pub async fn run<F, C>(
    fetcher: &F,
    summarizer: &Summarizer<C>,
    sources: &[Source],
    output_path: &Path,
) -> Result<RunReport, Box<dyn Error>>
where
    F: PageFetcher,
    C: ChatClient,
{
    let articles = collect_articles(fetcher, sources).await;
    let contents: Vec<String> = articles.iter().map(|a| a.content.clone()).collect();

    let summary = match summarizer.summarize(&contents).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(
                error = %e,
                articles = articles.len(),
                "Summarization failed; writing articles without a summary"
            );
            if let Err(write_err) = write_table(output_path, &articles, None).await {
                error!(error = %write_err, "Failed to write partial table");
            }
            return Err(e.into());
        }
    };

    write_table(output_path, &articles, Some(&summary)).await?;
    info!(
        articles = articles.len(),
        tokens_used = summary.tokens_used,
        "Run complete"
    );
    Ok(RunReport { articles, summary })
}
