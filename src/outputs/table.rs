//! CSV output of the scraped articles and the summary.
//!
//! # Layout
//!
//! ```text
//! Source,Title,URL,Content,Tokens Used
//! CNN,First headline,https://edition.cnn.com/...,Article body...,
//! BBC,Second headline,https://www.bbc.com/...,Article body...,
//! ALL,Global summary,,The summary text,1234
//! ```
//!
//! The summary row is always last and is the only row with a value in the
//! `Tokens Used` column. The file is rewritten from scratch on every run.

use crate::models::{ArticleRecord, Summary};
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub const HEADERS: [&str; 5] = ["Source", "Title", "URL", "Content", "Tokens Used"];

/// Source column value of the summary row.
pub const SUMMARY_SOURCE: &str = "ALL";
/// Title column value of the summary row.
pub const SUMMARY_TITLE: &str = "Global summary";

/// One CSV row. `tokens_used` is only set on the summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow<'a> {
    pub source: &'a str,
    pub title: &'a str,
    pub url: &'a str,
    pub content: &'a str,
    pub tokens_used: Option<u64>,
}

/// Rows for every article followed by the summary row, if there is one.
pub fn build_table<'a>(
    articles: &'a [ArticleRecord],
    summary: Option<&'a Summary>,
) -> Vec<TableRow<'a>> {
    let mut rows: Vec<TableRow<'a>> = articles
        .iter()
        .map(|article| TableRow {
            source: &article.source,
            title: &article.title,
            url: &article.url,
            content: &article.content,
            tokens_used: None,
        })
        .collect();

    if let Some(summary) = summary {
        rows.push(TableRow {
            source: SUMMARY_SOURCE,
            title: SUMMARY_TITLE,
            url: "",
            content: &summary.text,
            tokens_used: Some(summary.tokens_used),
        });
    }
    rows
}

/// Serialize rows as CSV with a header line and `\n` record terminators.
pub fn render_csv(rows: &[TableRow<'_>]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

/// Write the articles and optional summary to `path`, replacing any existing file.
///
/// Without a summary only the article rows are written; this is the
/// partial output kept when summarization fails.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_table(
    path: &Path,
    articles: &[ArticleRecord],
    summary: Option<&Summary>,
) -> Result<(), Box<dyn Error>> {
    let rows = build_table(articles, summary);
    let bytes = render_csv(&rows)?;
    fs::write(path, bytes).await?;
    info!(rows = rows.len(), with_summary = summary.is_some(), "Wrote CSV table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(source: &str, title: &str, content: &str) -> ArticleRecord {
        ArticleRecord {
            source: source.to_string(),
            title: title.to_string(),
            url: format!("https://example.com/{}", title.to_lowercase()),
            content: content.to_string(),
        }
    }

    fn summary() -> Summary {
        Summary {
            text: "All quiet.".to_string(),
            tokens_used: 42,
        }
    }

    #[test]
    fn test_summary_row_is_last_and_only_one_with_tokens() {
        let articles = vec![article("CNN", "One", "a"), article("BBC", "Two", "b")];
        let summary = summary();
        let rows = build_table(&articles, Some(&summary));

        assert_eq!(rows.len(), articles.len() + 1);
        let last = rows.last().unwrap();
        assert_eq!(last.source, "ALL");
        assert_eq!(last.url, "");
        assert_eq!(last.content, "All quiet.");
        assert_eq!(last.tokens_used, Some(42));
        assert!(rows[..rows.len() - 1].iter().all(|r| r.tokens_used.is_none()));
    }

    #[test]
    fn test_render_csv_layout() {
        let articles = vec![article("CNN", "One", "Body, with comma")];
        let summary = summary();
        let rows = build_table(&articles, Some(&summary));
        let csv = String::from_utf8(render_csv(&rows).unwrap()).unwrap();

        assert_eq!(
            csv,
            "Source,Title,URL,Content,Tokens Used\n\
             CNN,One,https://example.com/one,\"Body, with comma\",\n\
             ALL,Global summary,,All quiet.,42\n"
        );
    }

    #[test]
    fn test_render_csv_quotes_multiline_content() {
        let articles = vec![article("BBC", "Two", "line one\nline \"two\"")];
        let csv = String::from_utf8(render_csv(&build_table(&articles, None)).unwrap()).unwrap();
        assert!(csv.contains("\"line one\nline \"\"two\"\"\""));
    }

    #[test]
    fn test_header_written_without_rows() {
        let csv = String::from_utf8(render_csv(&[]).unwrap()).unwrap();
        assert_eq!(csv, "Source,Title,URL,Content,Tokens Used\n");
    }

    #[tokio::test]
    async fn test_write_table_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news_summary.csv");
        std::fs::write(&path, "stale row that is longer than the new table\n".repeat(10)).unwrap();

        let summary = summary();
        write_table(&path, &[], Some(&summary)).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "Source,Title,URL,Content,Tokens Used\nALL,Global summary,,All quiet.,42\n"
        );
    }
}
