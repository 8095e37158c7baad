//! Data models for scraped articles and the generated summary.
//!
//! This module defines the core data structures passed between pipeline stages:
//! - [`Source`]: A configured news site (name, listing URL, site variant)
//! - [`Headline`]: A title/detail-link pair discovered on a listing page
//! - [`ArticleRecord`]: One scraped article, as written to the output table
//! - [`Summary`]: The LLM summary of every article plus its token usage

use serde::{Deserialize, Serialize};

/// Site variants with a dedicated markup adapter.
///
/// The variant decides which selectors are used for both the listing page
/// and the article pages of a [`Source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Cnn,
    Bbc,
}

/// A news source: a display name and the listing page to scrape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Source {
    /// Name written to the `Source` column (e.g. `"CNN"`).
    pub name: String,
    /// Absolute URL of the front page listing the headlines.
    pub url: String,
    /// Which adapter parses this source's markup.
    pub site: Site,
}

impl Source {
    pub fn new(name: &str, url: &str, site: Site) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            site,
        }
    }
}

/// The sources scraped when no configuration overrides them, in scrape order.
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::new("CNN", "https://edition.cnn.com/", Site::Cnn),
        Source::new("BBC", "https://www.bbc.com/", Site::Bbc),
    ]
}

/// A headline found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    /// Whitespace-trimmed, never empty.
    pub title: String,
    /// Absolute URL of the article page.
    pub url: String,
}

/// A scraped article.
///
/// `content` holds the article body text. When the article page answered
/// with a non-2xx status it holds the error message produced by
/// [`crate::scrapers::ArticleBody::into_content`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Name of the [`Source`] the headline was found on.
    pub source: String,
    pub title: String,
    pub url: String,
    pub content: String,
}

/// Summary of all articles as returned by the language model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// The generated summary, trimmed.
    pub text: String,
    /// Prompt plus completion tokens reported by the API.
    pub tokens_used: u64,
}
