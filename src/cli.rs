//! Command-line interface definitions for newsdesk.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The news API key can also be supplied through the environment.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for newsdesk.
///
/// # Examples
///
/// ```sh
/// # Interactive headline viewer
/// NEWS_API_KEY=... newsdesk news apple
///
/// # Interactive scraper, starting on a given page
/// newsdesk scrape https://example.com --tag h1
///
/// # Print a single scrape to stdout instead of opening the terminal UI
/// newsdesk scrape https://example.com --tag p --print
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file for interactive sessions (defaults to newsdesk.log in the temp dir)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the news API and browse clickable headlines
    News(NewsArgs),
    /// Extract the text of every element with a given tag from a web page
    Scrape(ScrapeArgs),
}

impl Command {
    /// Whether this invocation takes over the terminal.
    pub fn is_interactive(&self) -> bool {
        match self {
            Command::News(args) => !args.print,
            Command::Scrape(args) => !args.print,
        }
    }
}

#[derive(Args, Debug)]
pub struct NewsArgs {
    /// Search topic (pre-filled in the query field)
    pub query: Option<String>,

    /// News API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// News search endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Oldest publication date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Newest publication date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Sort order requested from the API
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Fetch once and print the headlines instead of opening the terminal UI
    #[arg(long)]
    pub print: bool,
}

#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// Target URL (pre-filled in the URL field)
    pub url: Option<String>,

    /// HTML tag to extract, e.g. h1 or p
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Scrape once and print the results instead of opening the terminal UI
    #[arg(long)]
    pub print: bool,
}
