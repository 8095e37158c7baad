//! Site adapters for locating headlines and article bodies in news markup.
//!
//! Each supported site has a [`SiteAdapter`] holding its hard-coded
//! selectors. Markup changes on a site only ever touch that site's module.
//! The functions in this module drive any adapter through the same two
//! phases:
//!
//! 1. **Headlines**: find the listing container on the front page and pull
//!    out `(title, link)` pairs, resolving links against the site's base URL
//! 2. **Bodies**: fetch each article page, find the content container and
//!    join the text of its paragraphs
//!
//! # Supported Sites
//!
//! | Site | Module | Title/link association |
//! |------|--------|------------------------|
//! | CNN | [`cnn`] | Link taken from the title's enclosing `<a>` |
//! | BBC | [`bbc`] | Parallel title and link lists paired by index |
//!
//! Missing markup is never an error: an absent container yields no
//! headlines, an absent body yields empty text.

use crate::fetch::{FetchError, PageFetcher};
use crate::models::{Headline, Site};
use itertools::Itertools;
use scraper::{ElementRef, Html};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

pub mod bbc;
pub mod cnn;

/// Selector strategy for one news site.
pub trait SiteAdapter {
    /// Base URL that relative detail links are resolved against.
    fn base_url(&self) -> &'static str;

    /// The element on the listing page that holds the headlines.
    fn locate_headline_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>>;

    /// Raw `(title text, href)` pairs found inside the headline container.
    ///
    /// Titles are returned untrimmed and links unresolved;
    /// [`extract_headlines`] normalizes both.
    fn extract_title_link_pairs(&self, container: ElementRef<'_>) -> Vec<(String, String)>;

    /// The element on an article page that holds the body paragraphs.
    fn locate_body_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>>;

    /// Paragraph elements of the body, in document order.
    fn extract_paragraphs<'a>(&self, container: ElementRef<'a>) -> Vec<ElementRef<'a>>;
}

impl Site {
    /// The adapter holding this site's selectors.
    pub fn adapter(self) -> &'static dyn SiteAdapter {
        match self {
            Site::Cnn => &cnn::CnnAdapter,
            Site::Bbc => &bbc::BbcAdapter,
        }
    }
}

/// Outcome of fetching and parsing one article page.
///
/// The stored article content does not distinguish failures from text (see
/// [`ArticleBody::into_content`]), but this type does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleBody {
    /// Joined paragraph text; empty when the page had no matching markup.
    Text(String),
    /// The article page answered with a non-2xx status.
    HttpError { status: u16 },
    /// The article page could not be reached at all.
    Unreachable,
}

impl ArticleBody {
    /// Content stored in the article record.
    ///
    /// A non-2xx page is stored as an error message carrying the status code
    /// and an unreachable page as empty text.
    pub fn into_content(self) -> String {
        match self {
            ArticleBody::Text(text) => text,
            ArticleBody::HttpError { status } => {
                format!("Error {status}: Unable to retrieve article content.")
            }
            ArticleBody::Unreachable => String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ArticleBody::Text(_))
    }
}

/// Full text of an element, trimmed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extract headlines from a parsed listing page.
///
/// Titles are trimmed and pairs with an empty title are dropped. Links that
/// cannot be resolved against the site's base URL are skipped.
pub fn extract_headlines(document: &Html, site: Site) -> Vec<Headline> {
    let adapter = site.adapter();
    let Some(container) = adapter.locate_headline_container(document) else {
        debug!(?site, "Headline container not found");
        return Vec::new();
    };

    let base = match Url::parse(adapter.base_url()) {
        Ok(base) => base,
        Err(e) => {
            error!(?site, error = %e, "Invalid site base URL");
            return Vec::new();
        }
    };

    adapter
        .extract_title_link_pairs(container)
        .into_iter()
        .filter_map(|(title, href)| {
            let title = title.trim();
            if title.is_empty() {
                return None;
            }
            match base.join(href.trim()) {
                Ok(url) => Some(Headline {
                    title: title.to_string(),
                    url: url.to_string(),
                }),
                Err(e) => {
                    debug!(%href, error = %e, "Skipping unresolvable headline link");
                    None
                }
            }
        })
        .collect()
}

/// Join the trimmed paragraph texts of an article page with single spaces.
///
/// Empty paragraphs are left out so no doubled separators appear.
pub fn extract_body_text(document: &Html, site: Site) -> String {
    let adapter = site.adapter();
    let Some(container) = adapter.locate_body_container(document) else {
        debug!(?site, "Body container not found");
        return String::new();
    };

    adapter
        .extract_paragraphs(container)
        .into_iter()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .join(" ")
}

/// Parse listing markup and extract its headlines.
pub fn parse_listing(html: &str, site: Site) -> Vec<Headline> {
    let document = Html::parse_document(html);
    extract_headlines(&document, site)
}

/// Fetch an article page and extract its body.
///
/// Fetch failures are logged here; the caller only sees the [`ArticleBody`]
/// variant.
#[instrument(level = "info", skip_all, fields(%url, ?site))]
pub async fn extract_body<F: PageFetcher>(fetcher: &F, url: &str, site: Site) -> ArticleBody {
    match fetcher.fetch(url).await {
        Ok(page) => {
            let document = Html::parse_document(&page.text);
            let text = extract_body_text(&document, site);
            info!(bytes = text.len(), "Parsed article body");
            ArticleBody::Text(text)
        }
        Err(FetchError::Status { status, .. }) => {
            warn!(status, %url, "Article page returned an error status");
            ArticleBody::HttpError { status }
        }
        Err(e) => {
            error!(error = %e, %url, "Could not reach article page");
            ArticleBody::Unreachable
        }
    }
}
