//! Single-pass summary of every scraped article.
//!
//! All article contents are joined into one prompt and sent in a single
//! chat-completion request. There is no chunking: a front page with a lot of
//! text may exceed the model's context window, in which case the API error
//! is returned to the caller.

use crate::api::{ApiError, ChatClient, ChatMessage, ChatRequest};
use crate::config::LlmConfig;
use crate::models::Summary;
use crate::outputs::summary::write_summary_file;
use crate::utils::truncate_for_log;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

pub const SYSTEM_PROMPT: &str = "You are a journalist and want to summarize articles.";

pub const USER_INSTRUCTION: &str =
    "Summarize the following articles into a single but detailed summary of the current news:";

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("could not write summary to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Sends the joined articles to a [`ChatClient`] and stores the result.
#[derive(Debug)]
pub struct Summarizer<C> {
    client: C,
    model: String,
    max_tokens: u32,
    summary_path: PathBuf,
}

impl<C: ChatClient> Summarizer<C> {
    pub fn new(client: C, llm: &LlmConfig, summary_path: impl Into<PathBuf>) -> Self {
        Self {
            client,
            model: llm.model.clone(),
            max_tokens: llm.max_tokens,
            summary_path: summary_path.into(),
        }
    }

    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn summary_path(&self) -> &Path {
        &self.summary_path
    }

    /// The completion request for the given article contents.
    pub fn build_request(&self, contents: &[String]) -> ChatRequest {
        let joined = join_contents(contents);
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(&format!("{USER_INSTRUCTION}\n\n{joined}")),
            ],
            max_tokens: self.max_tokens,
        }
    }

    /// Summarize `contents` and write the summary to the side file.
    ///
    /// Empty contents (failed fetches) are sent as empty strings, not
    /// filtered out.
    #[instrument(level = "info", skip_all, fields(articles = contents.len(), model = %self.model))]
    pub async fn summarize(&self, contents: &[String]) -> Result<Summary, SummarizeError> {
        info!("Summarizing all articles");
        let request = self.build_request(contents);
        let response = self.client.complete(&request).await?;

        let text = response.first_content()?.trim().to_string();
        let tokens_used = response.total_tokens()?;
        if let Some(usage) = response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Token usage"
            );
        }
        debug!(preview = %truncate_for_log(&text, 200), "Summary text");

        write_summary_file(&self.summary_path, &text)
            .await
            .map_err(|source| SummarizeError::Io {
                path: self.summary_path.display().to_string(),
                source,
            })?;

        info!(tokens_used, bytes = text.len(), "Summary complete");
        Ok(Summary { text, tokens_used })
    }
}

/// Join article contents with a blank line between each.
pub fn join_contents(contents: &[String]) -> String {
    contents.join("\n\n")
}
