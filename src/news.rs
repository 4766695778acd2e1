//! News search: request, decode, render.
//!
//! The viewer sends the user's query to a news search endpoint (NewsAPI's
//! `/v2/everything` by default), decodes the `articles` list and renders each
//! entry as a title line, a description line and a 40-character separator.
//! Every article with a URL gets a [`TitleSpan`] so a click on its title can
//! be resolved back to the link.
//!
//! Rendering is a pure function of the [`NewsOutcome`]; all network access
//! lives in [`fetch_articles`].

use crate::config::NewsSettings;
use crate::models::{Article, NewsResponse};
use crate::output::{RenderedOutput, StyledText, TextStyle, TitleSpan};
use crate::utils::{redact_api_key, truncate_for_log};
use reqwest::Client;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Width of the dashed line between articles.
pub const SEPARATOR_WIDTH: usize = 40;

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a topic to search.\n";
pub const NO_ARTICLES_MESSAGE: &str = "No articles found.\n";

/// Why a news fetch produced no articles.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no API key configured (use --api-key, NEWS_API_KEY or the config file)")]
    MissingApiKey,
    #[error("invalid endpoint URL {endpoint}: {detail}")]
    InvalidEndpoint { endpoint: String, detail: String },
    /// Connection, timeout or body transfer failure.
    #[error("{0}")]
    Network(String),
    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),
    /// The body was not the expected JSON.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key; keep it out of messages.
        FetchError::Network(err.without_url().to_string())
    }
}

/// Result of one search action, ready to be rendered.
#[derive(Debug)]
pub enum NewsOutcome {
    /// The query field was blank; no request was made.
    EmptyQuery,
    Failed(FetchError),
    Articles(Vec<Article>),
}

/// Build the search URL for `query` from `settings`.
pub fn build_request_url(settings: &NewsSettings, query: &str) -> Result<Url, FetchError> {
    let api_key = settings
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(FetchError::MissingApiKey)?;

    let mut params: Vec<(&str, String)> = vec![("q", query.to_string())];
    if let Some(from) = settings.from {
        params.push(("from", from.format("%Y-%m-%d").to_string()));
    }
    if let Some(to) = settings.to {
        params.push(("to", to.format("%Y-%m-%d").to_string()));
    }
    params.push(("sortBy", settings.sort_by.clone()));
    params.push(("apiKey", api_key.to_string()));

    Url::parse_with_params(&settings.endpoint, &params).map_err(|e| {
        FetchError::InvalidEndpoint {
            endpoint: settings.endpoint.clone(),
            detail: e.to_string(),
        }
    })
}

/// Fetch and decode the articles matching `query`.
#[instrument(level = "info", skip(client, settings))]
pub async fn fetch_articles(
    client: &Client,
    settings: &NewsSettings,
    query: &str,
) -> Result<Vec<Article>, FetchError> {
    let url = build_request_url(settings, query)?;
    debug!(url = %redact_api_key(&url), "Requesting news");

    let t0 = Instant::now();
    let mut request = client.get(url);
    if let Some(timeout) = settings.timeout {
        request = request.timeout(timeout);
    }
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    let body = response.text().await?;

    let decoded: NewsResponse = serde_json::from_str(&body).map_err(|e| {
        warn!(
            error = %e,
            body_preview = %truncate_for_log(&body, 300),
            "News response is not the expected JSON"
        );
        FetchError::Decode(e.to_string())
    })?;

    info!(
        count = decoded.articles.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Fetched articles"
    );
    Ok(decoded.articles)
}

/// Run one search for the raw contents of the query field.
///
/// Blank input short-circuits to [`NewsOutcome::EmptyQuery`] without touching
/// the network.
pub async fn search(client: &Client, settings: &NewsSettings, raw_query: &str) -> NewsOutcome {
    let query = raw_query.trim();
    if query.is_empty() {
        return NewsOutcome::EmptyQuery;
    }
    match fetch_articles(client, settings, query).await {
        Ok(articles) => NewsOutcome::Articles(articles),
        Err(e) => {
            warn!(error = %e, "News fetch failed");
            NewsOutcome::Failed(e)
        }
    }
}

/// Render an outcome into styled text and title spans.
pub fn render_news(outcome: &NewsOutcome) -> RenderedOutput {
    match outcome {
        NewsOutcome::EmptyQuery => {
            RenderedOutput::message(EMPTY_QUERY_MESSAGE, TextStyle::Description)
        }
        NewsOutcome::Failed(e) => RenderedOutput::message(
            &format!("Error fetching news: {e}\n"),
            TextStyle::Description,
        ),
        NewsOutcome::Articles(articles) if articles.is_empty() => {
            RenderedOutput::message(NO_ARTICLES_MESSAGE, TextStyle::Description)
        }
        NewsOutcome::Articles(articles) => render_articles(articles),
    }
}

fn render_articles(articles: &[Article]) -> RenderedOutput {
    let mut text = StyledText::new();
    let mut spans = Vec::new();
    let separator = format!("{}\n", "-".repeat(SEPARATOR_WIDTH));

    for article in articles {
        let start = text.char_len();
        text.push(&format!("{}\n", article.display_title()), TextStyle::Title);
        text.push(
            &format!("{}\n", article.display_description()),
            TextStyle::Description,
        );
        text.push(&separator, TextStyle::Separator);

        if let Some(url) = article.link() {
            spans.push(TitleSpan {
                start,
                end: text.find_newline_from(start),
                url: url.to_string(),
            });
        }
    }

    RenderedOutput { text, spans }
}
