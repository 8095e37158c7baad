//! Collects article records from every configured source.
//!
//! Sources are visited in configuration order and their headlines in the
//! order they appear on the listing page. Every request is awaited before the
//! next one starts.

use crate::fetch::{FetchError, PageFetcher};
use crate::models::{ArticleRecord, Source};
use crate::scrapers::{extract_body, parse_listing};
use tracing::{debug, error, info, instrument, warn};

/// Scrape one [`ArticleRecord`] per headline across `sources`.
///
/// A source whose listing page cannot be fetched is skipped. Article pages
/// that fail still produce a record (see [`crate::scrapers::ArticleBody`]).
#[instrument(level = "info", skip_all, fields(sources = sources.len()))]
pub async fn collect_articles<F: PageFetcher>(
    fetcher: &F,
    sources: &[Source],
) -> Vec<ArticleRecord> {
    let mut records = Vec::new();
    for source in sources {
        records.extend(collect_source(fetcher, source).await);
    }
    info!(count = records.len(), "Collected articles from all sources");
    records
}

/// Scrape a single source.
#[instrument(level = "info", skip(fetcher, source), fields(source = %source.name, url = %source.url))]
pub async fn collect_source<F: PageFetcher>(fetcher: &F, source: &Source) -> Vec<ArticleRecord> {
    info!("Accessing listing page");
    let page = match fetcher.fetch(&source.url).await {
        Ok(page) => page,
        Err(FetchError::Status { status, .. }) => {
            warn!(status, "Listing page returned an error status; skipping source");
            return Vec::new();
        }
        Err(e) => {
            error!(error = %e, "Listing page unreachable; skipping source");
            return Vec::new();
        }
    };

    let headlines = parse_listing(&page.text, source.site);
    info!(count = headlines.len(), status = page.status, "Indexed headlines");
    debug!(urls = ?headlines.iter().map(|h| h.url.as_str()).collect::<Vec<_>>(), "Headline URLs");

    let mut records = Vec::with_capacity(headlines.len());
    let mut failed = 0usize;
    for headline in headlines {
        let body = extract_body(fetcher, &headline.url, source.site).await;
        if !body.is_success() {
            failed += 1;
        }
        records.push(ArticleRecord {
            source: source.name.clone(),
            title: headline.title,
            url: headline.url,
            content: body.into_content(),
        });
    }
    info!(count = records.len(), failed, "Fetched article bodies");
    records
}
