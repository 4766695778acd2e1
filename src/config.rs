//! Runtime configuration.
//!
//! Settings come from three layers, highest precedence first:
//!
//! 1. Command-line flags and environment variables (see [`crate::cli`])
//! 2. An optional YAML file passed with `--config`
//! 3. Built-in defaults
//!
//! # File format
//!
//! ```yaml
//! news:
//!   api_key: "..."
//!   endpoint: "https://newsapi.org/v2/everything"
//!   default_query: "tesla"
//!   sort_by: "popularity"
//!   from: 2025-11-03
//!   to: 2025-11-03
//!   timeout_secs: 30
//! scrape:
//!   default_url: "https://example.com/"
//!   timeout_secs: 15
//! ```

use crate::cli::{NewsArgs, ScrapeArgs};
use crate::scrape::DEFAULT_URL;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// News search endpoint used when none is configured.
pub const DEFAULT_NEWS_ENDPOINT: &str = "https://newsapi.org/v2/everything";
/// Sort order requested from the news endpoint.
pub const DEFAULT_SORT_BY: &str = "popularity";
/// Initial contents of the news query field.
pub const DEFAULT_QUERY: &str = "tesla";
/// Timeout for scrape requests.
pub const DEFAULT_SCRAPE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub news: NewsFileConfig,
    pub scrape: ScrapeFileConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsFileConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub default_query: Option<String>,
    pub sort_by: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeFileConfig {
    /// URL the scraper starts with. Reset still restores the built-in one.
    pub default_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Load the config file at `path`, or the defaults when no path is given.
#[instrument(level = "info")]
pub fn load(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let Some(path) = path else {
        debug!("No config file given; using defaults");
        return Ok(FileConfig::default());
    };
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

fn parse(raw: &str) -> Result<FileConfig, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(raw)
}

/// Fully resolved settings for the news viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub sort_by: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// `None` means the request may take as long as it takes.
    pub timeout: Option<Duration>,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_NEWS_ENDPOINT.to_string(),
            api_key: None,
            sort_by: DEFAULT_SORT_BY.to_string(),
            from: None,
            to: None,
            timeout: None,
        }
    }
}

impl NewsSettings {
    pub fn resolve(args: &NewsArgs, file: &NewsFileConfig) -> Self {
        let defaults = Self::default();
        Self {
            endpoint: args
                .endpoint
                .clone()
                .or_else(|| file.endpoint.clone())
                .unwrap_or(defaults.endpoint),
            api_key: args.api_key.clone().or_else(|| file.api_key.clone()),
            sort_by: args
                .sort_by
                .clone()
                .or_else(|| file.sort_by.clone())
                .unwrap_or(defaults.sort_by),
            from: args.from.or(file.from),
            to: args.to.or(file.to),
            timeout: file.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// The query the news screen starts with.
pub fn initial_query(args: &NewsArgs, file: &NewsFileConfig) -> String {
    args.query
        .clone()
        .or_else(|| file.default_query.clone())
        .unwrap_or_else(|| DEFAULT_QUERY.to_string())
}

/// The URL the scraper starts with.
pub fn initial_url(args: &ScrapeArgs, file: &ScrapeFileConfig) -> String {
    args.url
        .clone()
        .or_else(|| file.default_url.clone())
        .unwrap_or_else(|| DEFAULT_URL.to_string())
}

/// Fully resolved settings for the scraper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeSettings {
    pub timeout: Duration,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SCRAPE_TIMEOUT,
        }
    }
}

impl ScrapeSettings {
    pub fn resolve(args: &ScrapeArgs, file: &ScrapeFileConfig) -> Self {
        Self {
            timeout: args
                .timeout_secs
                .or(file.timeout_secs)
                .map_or(DEFAULT_SCRAPE_TIMEOUT, Duration::from_secs),
        }
    }
}
