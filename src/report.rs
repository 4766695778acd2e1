//! One-shot, non-interactive runs (`--print`).
//!
//! These run exactly the same pipelines as the terminal UI and write the
//! rendered output as plain text. Dialogs go to stderr.

use crate::config::{NewsSettings, ScrapeSettings};
use crate::news::{self, NewsOutcome, render_news};
use crate::output::{OutputRegion, RenderedOutput};
use crate::scrape::{self, Dialog, begin_scrape, validate_input};
use reqwest::Client;
use std::io::{self, Write};

/// Plain-text rendering of a news result, followed by its link list.
pub fn news_report(rendered: &RenderedOutput) -> String {
    let mut report = rendered.text.as_str().to_string();
    if !rendered.spans.is_empty() {
        report.push_str("\nLinks:\n");
        for span in &rendered.spans {
            let title = rendered.text.slice_chars(span.start..span.end);
            report.push_str(&format!("  {title}\n    {}\n", span.url));
        }
    }
    report
}

fn dialog_line(dialog: &Dialog) -> String {
    format!("{}: {}", dialog.title, dialog.message)
}

/// Search once and print the headlines. Returns whether articles were fetched.
pub async fn print_news(
    client: &Client,
    settings: &NewsSettings,
    query: &str,
    out: &mut impl Write,
) -> io::Result<bool> {
    let outcome = news::search(client, settings, query).await;
    writeln!(out, "{}", news_report(&render_news(&outcome)).trim_end())?;
    Ok(matches!(outcome, NewsOutcome::Articles(_)))
}

/// Scrape once and print the result. Returns whether the scrape succeeded.
pub async fn print_scrape(
    client: &Client,
    settings: &ScrapeSettings,
    url: &str,
    tag: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<bool> {
    let request = match validate_input(url, tag) {
        Ok(request) => request,
        Err(e) => {
            writeln!(err, "{}", dialog_line(&e.dialog()))?;
            return Ok(false);
        }
    };

    let mut region = OutputRegion::default();
    begin_scrape(&mut region, &request);
    let dialog = scrape::scrape_into(client, settings.timeout, &request, &mut region).await;

    writeln!(out, "{}", region.text().as_str().trim_end())?;
    if let Some(dialog) = &dialog {
        writeln!(err, "{}", dialog_line(dialog))?;
    }
    Ok(dialog.is_none())
}
