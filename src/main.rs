//! # newsdesk
//!
//! Two small terminal tools sharing one binary:
//!
//! - `newsdesk news`: searches a news API and lists headlines. Clicking a
//!   headline opens the article in the default browser.
//! - `newsdesk scrape`: fetches a web page and shows the text of every element
//!   with a given HTML tag.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... newsdesk news apple
//! newsdesk scrape https://example.com --tag h1
//! newsdesk scrape https://example.com --tag p --print
//! ```
//!
//! ## Architecture
//!
//! Each tool is a single linear pipeline:
//! 1. **Input**: query, or URL and tag, from the terminal UI or the CLI
//! 2. **Fetch**: one HTTP GET (no retries)
//! 3. **Decode**: JSON articles, or HTML elements selected by tag name
//! 4. **Render**: styled text into a read-only output region

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod browser;
mod cli;
mod config;
mod models;
mod news;
mod output;
mod report;
mod scrape;
mod tui;
mod utils;

use cli::{Cli, Command};
use config::{NewsSettings, ScrapeSettings};

/// Log file used by interactive sessions when `--log-file` is not given.
fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("newsdesk.log")
}

/// Set up tracing.
///
/// One-shot runs log to stderr (default level `warn`). Interactive runs own
/// the terminal, so they log to a file through a non-blocking writer whose
/// guard must be kept alive until exit.
fn init_tracing(interactive: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let default_level = if interactive { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let timer = tracing_subscriber::fmt::time::UtcTime::rfc_3339();

    if !interactive {
        tfmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_timer(timer)
            .with_writer(std::io::stderr)
            .init();
        return None;
    }

    let path = log_file.map_or_else(default_log_path, Path::to_path_buf);
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            tfmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(writer)
                .init();
            info!(path = %path.display(), "Logging initialized");
            Some(guard)
        }
        Err(e) => {
            // The terminal UI owns stdout/stderr; without a file, drop logs.
            tfmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
            warn!(path = %path.display(), error = %e, "Failed to open log file");
            None
        }
    }
}

fn http_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error + Send + Sync>> {
    let args = Cli::parse();
    let _log_guard = init_tracing(args.command.is_interactive(), args.log_file.as_deref());
    debug!(config = ?args.config, log_file = ?args.log_file, "Parsed CLI arguments");

    let file_config = config::load(args.config.as_deref())?;
    let client = http_client()?;

    match args.command {
        Command::News(news_args) => {
            let settings = NewsSettings::resolve(&news_args, &file_config.news);
            let query = config::initial_query(&news_args, &file_config.news);
            info!(endpoint = %settings.endpoint, has_api_key = settings.api_key.is_some(), "News settings resolved");

            if news_args.print {
                let ok = report::print_news(&client, &settings, &query, &mut std::io::stdout())
                    .await?;
                return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
            }
            tui::run_news(client, settings, &query).await?;
        }
        Command::Scrape(scrape_args) => {
            let settings = ScrapeSettings::resolve(&scrape_args, &file_config.scrape);
            let url = config::initial_url(&scrape_args, &file_config.scrape);
            info!(timeout = ?settings.timeout, %url, "Scrape settings resolved");

            if scrape_args.print {
                let tag = scrape_args.tag.as_deref().unwrap_or_default();
                let ok = report::print_scrape(
                    &client,
                    &settings,
                    &url,
                    tag,
                    &mut std::io::stdout(),
                    &mut std::io::stderr(),
                )
                .await?;
                return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
            }
            tui::run_scraper(
                client,
                settings,
                Some(&url),
                scrape_args.tag.as_deref(),
            )
            .await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
