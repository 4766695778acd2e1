//! Tag-based text extraction from arbitrary web pages.
//!
//! A scrape takes a URL and an HTML tag name, fetches the page and renders
//! the normalized text of every element with that tag:
//!
//! ```text
//! [H1]: Example Domain
//!
//! --- Scrape Complete: Found 1 element(s) with content. ---
//! ```
//!
//! Input problems are reported as [`Dialog`]s before any request is made.
//! Fetch failures produce both a dialog and an `ERROR` block appended to the
//! output. Every write goes through an [`OutputWriter`], so the output region
//! is read-only again as soon as a step returns.

use crate::models::{Extraction, ScrapedElement};
use crate::output::{OutputRegion, OutputWriter, RenderedOutput, TextStyle};
use crate::utils::normalize_whitespace;
use reqwest::Client;
use scraper::{ElementRef, Html};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// URL restored by the reset action.
pub const DEFAULT_URL: &str = "https://old.reddit.com/";

/// Severity of a blocking dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A blocking message the user must dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Dialog {
    fn new(severity: Severity, title: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// Rejected scrape input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter both the Target URL and the HTML Tag.")]
    Missing,
    #[error("The URL must start with http:// or https://.")]
    BadScheme,
}

impl InputError {
    pub fn dialog(&self) -> Dialog {
        match self {
            InputError::Missing => Dialog::new(Severity::Warning, "Input Required", self.to_string()),
            InputError::BadScheme => Dialog::new(Severity::Error, "Invalid URL", self.to_string()),
        }
    }
}

/// Validated scrape input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub url: String,
    pub tag: String,
}

/// Check the raw field contents. Both are trimmed first.
pub fn validate_input(url: &str, tag: &str) -> Result<ScrapeRequest, InputError> {
    let url = url.trim();
    let tag = tag.trim();
    if url.is_empty() || tag.is_empty() {
        return Err(InputError::Missing);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(InputError::BadScheme);
    }
    Ok(ScrapeRequest {
        url: url.to_string(),
        tag: tag.to_string(),
    })
}

/// Failure while fetching or reading the page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Connection, timeout, redirect or non-success status.
    #[error("{0}")]
    Network(String),
    /// Anything else, e.g. a body that could not be decoded.
    #[error("{0}")]
    Unexpected(String),
}

impl ScrapeError {
    pub fn dialog(&self) -> Dialog {
        match self {
            ScrapeError::Network(e) => Dialog::new(
                Severity::Error,
                "Network Error",
                format!("Could not connect or fetch data: {e}"),
            ),
            ScrapeError::Unexpected(e) => Dialog::new(
                Severity::Error,
                "Scraping Error",
                format!("An unexpected error occurred: {e}"),
            ),
        }
    }

    /// Text appended to the output region for this failure.
    pub fn output_message(&self) -> String {
        match self {
            ScrapeError::Network(e) => {
                format!("ERROR: Network or HTTP issue. Check the URL and connection.\n{e}")
            }
            ScrapeError::Unexpected(e) => format!("ERROR: An unexpected error occurred.\n{e}"),
        }
    }
}

/// GET `url` and return the body as text.
#[instrument(level = "info", skip(client))]
pub async fn fetch_page(client: &Client, url: &str, timeout: Duration) -> Result<String, ScrapeError> {
    let network = |e: reqwest::Error| ScrapeError::Network(e.to_string());

    let t0 = Instant::now();
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(network)?
        .error_for_status()
        .map_err(network)?;
    let body = response.text().await.map_err(|e| {
        if e.is_decode() {
            ScrapeError::Unexpected(e.to_string())
        } else {
            ScrapeError::Network(e.to_string())
        }
    })?;

    info!(
        bytes = body.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Fetched page"
    );
    Ok(body)
}

/// Elements whose text is source or inert markup rather than page content.
const HIDDEN_TEXT_TAGS: [&str; 3] = ["script", "style", "template"];

/// Concatenated text nodes of `element`, leaving out anything nested in a
/// script, style or template below it. Selecting one of those tags directly
/// still yields its own text.
fn visible_text(element: ElementRef<'_>) -> String {
    let root = element.id();
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != root)
                .filter_map(ElementRef::wrap)
                .any(|ancestor| HIDDEN_TEXT_TAGS.contains(&ancestor.value().name()));
            (!hidden).then_some(&**text)
        })
        .collect()
}

/// Select every element named `tag` and collect its normalized text.
///
/// Tag names are compared exactly against the names the HTML parser assigns,
/// which are lowercase for HTML elements.
pub fn extract_elements(html: &str, tag: &str) -> Extraction {
    let document = Html::parse_document(html);
    let mut extraction = Extraction::default();

    for element in document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == tag)
    {
        extraction.matched += 1;
        // Text nodes are joined as-is before collapsing whitespace, so
        // `First <b>bold</b> paragraph` keeps its word breaks.
        let text = normalize_whitespace(&visible_text(element));
        if !text.is_empty() {
            extraction.elements.push(ScrapedElement {
                tag: tag.to_string(),
                text,
            });
        }
    }

    extraction
}

/// Write the extracted elements and the summary line.
pub fn write_extraction(writer: &mut OutputWriter<'_>, tag: &str, extraction: &Extraction) {
    let label = format!("[{}]: ", tag.to_uppercase());
    for element in &extraction.elements {
        writer.push(&label, TextStyle::Label);
        writer.push(&format!("{}\n\n", element.text), TextStyle::Body);
    }

    if extraction.matched == 0 {
        writer.push(
            &format!("No elements found for tag <{tag}>."),
            TextStyle::Warning,
        );
    } else if extraction.elements.is_empty() {
        writer.push(
            &format!("No *non-empty* text found for tag <{tag}> in the elements collected."),
            TextStyle::Warning,
        );
    } else {
        writer.push(
            &format!(
                "--- Scrape Complete: Found {} element(s) with content. ---\n",
                extraction.elements.len()
            ),
            TextStyle::Success,
        );
    }
}

/// Replace the output with the "in progress" line for `request`.
pub fn begin_scrape(region: &mut OutputRegion, request: &ScrapeRequest) {
    let mut writer = region.begin_update();
    writer.clear();
    writer.push(
        &format!("Scraping {} for tag <{}>...\n", request.url, request.tag),
        TextStyle::Info,
    );
}

/// Fetch the page for `request` and render the result into `region`.
///
/// On success the output is replaced by the extraction. On failure the
/// `ERROR` block is appended after the in-progress line and the dialog to
/// show is returned.
pub async fn scrape_into(
    client: &Client,
    timeout: Duration,
    request: &ScrapeRequest,
    region: &mut OutputRegion,
) -> Option<Dialog> {
    match fetch_page(client, &request.url, timeout).await {
        Ok(html) => {
            let extraction = extract_elements(&html, &request.tag);
            info!(
                tag = %request.tag,
                matched = extraction.matched,
                non_empty = extraction.elements.len(),
                "Extracted elements"
            );
            let mut writer = region.begin_update();
            writer.clear();
            write_extraction(&mut writer, &request.tag, &extraction);
            None
        }
        Err(e) => {
            warn!(url = %request.url, error = %e, "Scrape failed");
            let mut writer = region.begin_update();
            writer.push(&e.output_message(), TextStyle::Error);
            Some(e.dialog())
        }
    }
}

/// Output shown when the scraper starts.
pub fn welcome_output() -> RenderedOutput {
    RenderedOutput::message(
        &format!("Welcome to the Advanced Scraper. Default URL set to: {DEFAULT_URL}\nPress 'Scrape' to begin!"),
        TextStyle::Info,
    )
}

/// Replace the output with the message shown after a reset.
pub fn reset_output(region: &mut OutputRegion) {
    let mut writer = region.begin_update();
    writer.replace(RenderedOutput::message(
        &format!("Input fields refreshed. Default URL set to: {DEFAULT_URL}\nReady to scrape!"),
        TextStyle::Info,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<!doctype html>
        <html>
          <head><title>Example</title></head>
          <body>
            <h1>  Hello

            World  </h1>
            <p>First <b>bold</b> paragraph</p>
            <p><br/></p>
            <p>   </p>
            <div><p>Nested</p></div>
          </body>
        </html>"#;

    #[test]
    fn test_validate_input() {
        assert_eq!(
            validate_input(" https://example.com ", " h1 "),
            Ok(ScrapeRequest {
                url: "https://example.com".to_string(),
                tag: "h1".to_string(),
            })
        );
        assert!(validate_input("http://example.com", "p").is_ok());
        assert_eq!(validate_input("", "p"), Err(InputError::Missing));
        assert_eq!(validate_input("https://example.com", "  "), Err(InputError::Missing));
        assert_eq!(validate_input("example.com", "p"), Err(InputError::BadScheme));
        assert_eq!(validate_input("ftp://example.com", "p"), Err(InputError::BadScheme));
    }

    #[test]
    fn test_input_error_dialogs() {
        let dialog = InputError::Missing.dialog();
        assert_eq!(dialog.severity, Severity::Warning);
        assert_eq!(dialog.title, "Input Required");

        let dialog = InputError::BadScheme.dialog();
        assert_eq!(dialog.severity, Severity::Error);
        assert_eq!(dialog.title, "Invalid URL");
        assert_eq!(dialog.message, "The URL must start with http:// or https://.");
    }

    #[test]
    fn test_extract_normalizes_whitespace() {
        let extraction = extract_elements(PAGE, "h1");
        assert_eq!(extraction.matched, 1);
        assert_eq!(extraction.elements[0].text, "Hello World");
    }

    #[test]
    fn test_extract_skips_empty_elements() {
        let extraction = extract_elements(PAGE, "p");
        assert_eq!(extraction.matched, 4);
        let texts: Vec<&str> = extraction.elements.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["First bold paragraph", "Nested"]);
    }

    #[test]
    fn test_extract_leaves_out_script_and_style_text() {
        let html = "<div>Hi<script>var x = 1;</script><style>.a{color:red}</style></div>";
        let extraction = extract_elements(html, "div");
        assert_eq!(extraction.elements[0].text, "Hi");

        let html = "<div>Shown<template><p>Inert</p></template> too</div>";
        assert_eq!(extract_elements(html, "div").elements[0].text, "Shown too");
    }

    #[test]
    fn test_extract_script_tag_keeps_its_own_text() {
        let html = "<body><script>var x = 1;</script><style>.a{color:red}</style></body>";
        assert_eq!(extract_elements(html, "script").elements[0].text, "var x = 1;");
        assert_eq!(extract_elements(html, "style").elements[0].text, ".a{color:red}");
    }

    #[test]
    fn test_extract_is_exact_on_parser_names() {
        assert_eq!(extract_elements(PAGE, "H1").matched, 0);
        assert_eq!(extract_elements(PAGE, "title").elements[0].text, "Example");
        assert_eq!(extract_elements(PAGE, "article").matched, 0);
    }

    #[test]
    fn test_write_extraction_found() {
        let mut region = OutputRegion::default();
        {
            let mut writer = region.begin_update();
            write_extraction(&mut writer, "p", &extract_elements(PAGE, "p"));
        }
        assert_eq!(
            region.text().as_str(),
            "[P]: First bold paragraph\n\n[P]: Nested\n\n--- Scrape Complete: Found 2 element(s) with content. ---\n"
        );
        assert_eq!(region.text().style_at(0), Some(TextStyle::Label));
        assert_eq!(region.text().style_at(5), Some(TextStyle::Body));
        assert!(!region.is_writable());
    }

    #[test]
    fn test_write_extraction_no_matches() {
        let mut region = OutputRegion::default();
        {
            let mut writer = region.begin_update();
            write_extraction(&mut writer, "table", &extract_elements(PAGE, "table"));
        }
        assert_eq!(region.text().as_str(), "No elements found for tag <table>.");
        assert_eq!(region.text().style_at(0), Some(TextStyle::Warning));
    }

    #[test]
    fn test_write_extraction_only_empty_matches() {
        let html = "<html><body><span><br/></span><span>\n  </span><span><i></i></span></body></html>";
        let extraction = extract_elements(html, "span");
        assert_eq!(extraction.matched, 3);
        assert!(extraction.elements.is_empty());

        let mut region = OutputRegion::default();
        {
            let mut writer = region.begin_update();
            write_extraction(&mut writer, "span", &extraction);
        }
        assert_eq!(
            region.text().as_str(),
            "No *non-empty* text found for tag <span> in the elements collected."
        );
    }

    #[test]
    fn test_reset_output() {
        let mut region = OutputRegion::new(RenderedOutput::message("stale", TextStyle::Error));
        reset_output(&mut region);
        assert_eq!(
            region.text().as_str(),
            "Input fields refreshed. Default URL set to: https://old.reddit.com/\nReady to scrape!"
        );
        assert!(!region.is_writable());
    }

    #[tokio::test]
    async fn test_scrape_into_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html; charset=utf-8"))
            .mount(&server)
            .await;

        let request = validate_input(&format!("{}/page", server.uri()), "h1").unwrap();
        let mut region = OutputRegion::new(welcome_output());
        begin_scrape(&mut region, &request);
        assert!(region.text().as_str().starts_with("Scraping http://"));

        let dialog = scrape_into(&Client::new(), Duration::from_secs(5), &request, &mut region).await;

        assert!(dialog.is_none());
        assert_eq!(
            region.text().as_str(),
            "[H1]: Hello World\n\n--- Scrape Complete: Found 1 element(s) with content. ---\n"
        );
        assert!(!region.is_writable());
    }

    #[tokio::test]
    async fn test_scrape_into_http_error_appends_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let request = validate_input(&format!("{}/missing", server.uri()), "p").unwrap();
        let mut region = OutputRegion::default();
        begin_scrape(&mut region, &request);

        let dialog = scrape_into(&Client::new(), Duration::from_secs(5), &request, &mut region)
            .await
            .expect("dialog for failed scrape");

        assert_eq!(dialog.title, "Network Error");
        assert!(dialog.message.starts_with("Could not connect or fetch data: "));
        let text = region.text().as_str();
        assert!(text.starts_with("Scraping "));
        assert!(text.contains("ERROR: Network or HTTP issue. Check the URL and connection.\n"));
        assert!(text.contains("404"));
        assert!(!region.is_writable());
    }

    #[tokio::test]
    async fn test_fetch_page_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<p>late</p>")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let url = format!("{}/slow", server.uri());
        let err = fetch_page(&Client::new(), &url, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Network(_)));
    }

    #[test]
    fn test_unexpected_error_messages() {
        let err = ScrapeError::Unexpected("bad body".to_string());
        assert_eq!(err.dialog().title, "Scraping Error");
        assert_eq!(err.dialog().message, "An unexpected error occurred: bad body");
        assert_eq!(
            err.output_message(),
            "ERROR: An unexpected error occurred.\nbad body"
        );
    }
}
