//! Command-line interface definitions for Headline Digest.
//!
//! Every flag is optional; running without arguments scrapes the default
//! sources and writes `news_summary.csv` and `summary.txt` to the current
//! directory. The API key is normally supplied through `OPENAI_API_KEY`
//! (a `.env` file in the working directory is honoured).

use clap::Parser;

/// Command-line arguments for the Headline Digest application.
///
/// # Examples
///
/// ```sh
/// # Defaults, key from the environment
/// headline_digest
///
/// # Custom output locations and a local OpenAI-compatible server
/// headline_digest -o out/news.csv -s out/summary.txt --api-base http://localhost:8080/v1
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// CSV file receiving one row per article plus the summary row
    #[arg(short, long, default_value = "news_summary.csv")]
    pub output: String,

    /// Plain-text file receiving the summary
    #[arg(short, long, default_value = "summary.txt")]
    pub summary_file: String,

    /// Optional path to a YAML config file (LLM settings and sources)
    #[arg(short, long)]
    pub config: Option<String>,

    /// API key for the chat-completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_API_BASE")]
    pub api_base: Option<String>,

    /// Model identifier sent with the completion request
    #[arg(long)]
    pub model: Option<String>,

    /// Maximum number of tokens the summary may use
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["headline_digest"]);

        assert_eq!(cli.output, "news_summary.csv");
        assert_eq!(cli.summary_file, "summary.txt");
        assert!(cli.config.is_none());
        assert!(cli.model.is_none());
        assert!(cli.max_tokens.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "headline_digest",
            "-o",
            "/tmp/news.csv",
            "-s",
            "/tmp/summary.txt",
            "-c",
            "digest.yaml",
        ]);

        assert_eq!(cli.output, "/tmp/news.csv");
        assert_eq!(cli.summary_file, "/tmp/summary.txt");
        assert_eq!(cli.config.as_deref(), Some("digest.yaml"));
    }

    #[test]
    fn test_cli_llm_flags() {
        let cli = Cli::parse_from([
            "headline_digest",
            "--api-key",
            "sk-test",
            "--model",
            "gpt-4o-mini",
            "--max-tokens",
            "800",
        ]);

        assert_eq!(cli.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cli.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(cli.max_tokens, Some(800));
    }
}
