//! Runtime settings: optional YAML file merged with CLI flags and environment.
//!
//! Precedence, highest first: command-line flag or its environment variable,
//! the YAML file given with `--config`, built-in defaults.
//!
//! ```yaml
//! llm:
//!   api_base: https://api.openai.com/v1
//!   model: gpt-3.5-turbo
//!   max_tokens: 2000
//! sources:
//!   - name: CNN
//!     url: https://edition.cnn.com/
//!     site: cnn
//! ```

use crate::cli::Cli;
use crate::models::{Source, default_sources};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("missing API key: set OPENAI_API_KEY, pass --api-key, or add llm.api_key to the config file")]
    MissingApiKey,

    #[error("no sources configured")]
    NoSources,
}

/// Settings for the chat-completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Cap on generated tokens.
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 2000,
        }
    }
}

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    pub llm: LlmConfig,
    pub sources: Vec<Source>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            sources: default_sources(),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub llm: LlmConfig,
    pub api_key: String,
    pub sources: Vec<Source>,
    pub output_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Read and parse a YAML config file.
#[instrument(level = "info")]
pub async fn load_config(path: &str) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).await.map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    let config = parse_config(&raw)?;
    info!(sources = config.sources.len(), model = %config.llm.model, "Loaded config file");
    Ok(config)
}

pub fn parse_config(raw: &str) -> Result<FileConfig, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    Ok(serde_yaml::from_str(raw)?)
}

/// Merge CLI arguments over the file config.
pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Settings, ConfigError> {
    let mut llm = file.llm;
    if let Some(api_base) = &cli.api_base {
        llm.api_base = api_base.clone();
    }
    if let Some(model) = &cli.model {
        llm.model = model.clone();
    }
    if let Some(max_tokens) = cli.max_tokens {
        llm.max_tokens = max_tokens;
    }

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| llm.api_key.clone())
        .filter(|key| !key.trim().is_empty())
        .ok_or(ConfigError::MissingApiKey)?;

    if file.sources.is_empty() {
        return Err(ConfigError::NoSources);
    }

    Ok(Settings {
        llm,
        api_key,
        sources: file.sources,
        output_path: PathBuf::from(&cli.output),
        summary_path: PathBuf::from(&cli.summary_file),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Site;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["headline_digest"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.max_tokens, 2000);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = parse_config("llm:\n  model: gpt-4o-mini\n").unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_base, "https://api.openai.com/v1");
        assert_eq!(config.sources, default_sources());
    }

    #[test]
    fn test_sources_from_file() {
        let raw = "sources:\n  - name: BBC\n    url: https://www.bbc.com/\n    site: bbc\n";
        let config = parse_config(raw).unwrap();
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].site, Site::Bbc);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(matches!(
            parse_config("llm:\n  max_tokens: plenty\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = FileConfig::default();
        file.llm.api_key = Some("from-file".to_string());
        file.llm.model = "file-model".to_string();

        let settings = resolve(
            &cli(&["--api-key", "from-cli", "--max-tokens", "500", "-o", "out.csv"]),
            file,
        )
        .unwrap();
        assert_eq!(settings.api_key, "from-cli");
        assert_eq!(settings.llm.model, "file-model");
        assert_eq!(settings.llm.max_tokens, 500);
        assert_eq!(settings.output_path, PathBuf::from("out.csv"));
        assert_eq!(settings.summary_path, PathBuf::from("summary.txt"));
    }

    #[test]
    fn test_key_from_file_when_cli_has_none() {
        let mut file = FileConfig::default();
        file.llm.api_key = Some("from-file".to_string());
        let mut args = cli(&[]);
        args.api_key = None;
        let settings = resolve(&args, file).unwrap();
        assert_eq!(settings.api_key, "from-file");
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let mut args = cli(&[]);
        args.api_key = None;
        assert!(matches!(
            resolve(&args, FileConfig::default()),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_empty_sources_rejected() {
        let file = FileConfig {
            sources: Vec::new(),
            ..FileConfig::default()
        };
        assert!(matches!(
            resolve(&cli(&["--api-key", "k"]), file),
            Err(ConfigError::NoSources)
        ));
    }
}
