//! Terminal front-end: lifecycle and the two event loops.
//!
//! Each loop is strictly sequential: draw, wait for one input event, turn it
//! into an effect through the screen's pure event handler, run the effect.
//! Network effects are awaited inline, so the interface is frozen while a
//! request is in flight.

mod input;
mod news_screen;
mod scrape_screen;
mod theme;
mod view;

use crate::browser;
use crate::config::{NewsSettings, ScrapeSettings};
use crate::news;
use crate::output::CursorStyle;
use crate::scrape;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    style::Print,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use news_screen::{NewsEffect, NewsScreen};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use scrape_screen::{ScrapeEffect, ScrapeScreen};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::{debug, info, warn};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn setup_terminal() -> Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
    Ok(())
}

/// OSC 22 pointer-shape request; ignored by terminals without support.
fn pointer_sequence(style: CursorStyle) -> &'static str {
    match style {
        CursorStyle::Pointer => "\x1b]22;pointer\x1b\\",
        CursorStyle::Arrow => "\x1b]22;default\x1b\\",
    }
}

/// Owns the terminal for the lifetime of a screen and restores it on drop,
/// including when the loop exits with an error.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn start() -> Result<Self> {
        setup_terminal()?;
        match Terminal::new(CrosstermBackend::new(io::stdout())) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = restore_terminal();
                Err(e.into())
            }
        }
    }

    fn set_pointer(&mut self, style: CursorStyle) -> Result<()> {
        execute!(io::stdout(), Print(pointer_sequence(style)))?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.set_pointer(CursorStyle::Arrow);
        if let Err(e) = restore_terminal() {
            warn!(error = %e, "Failed to restore terminal");
        }
    }
}

fn next_event() -> Result<Option<Event>> {
    if event::poll(POLL_INTERVAL)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Run the headline viewer until the user quits.
pub async fn run_news(client: Client, settings: NewsSettings, initial_query: &str) -> Result<()> {
    let mut session = TerminalSession::start()?;
    let mut screen = NewsScreen::new(initial_query);
    info!("News viewer started");

    loop {
        session.terminal.draw(|frame| screen.draw(frame))?;
        let Some(event) = next_event()? else {
            continue;
        };
        match screen.handle_event(event) {
            NewsEffect::None => {}
            NewsEffect::Quit => break,
            NewsEffect::SetPointer(style) => session.set_pointer(style)?,
            NewsEffect::OpenUrl(url) => {
                info!(%url, "Opening article");
                browser::open_url(&url);
            }
            NewsEffect::Fetch(query) => {
                screen.set_busy(true);
                session.terminal.draw(|frame| screen.draw(frame))?;
                let outcome = news::search(&client, &settings, &query).await;
                screen.apply(&outcome);
                screen.set_busy(false);
                debug!(
                    links = screen.output().spans().len(),
                    "Rendered headlines"
                );
            }
        }
    }

    info!("News viewer closed");
    Ok(())
}

/// Run the scraper until the user quits.
pub async fn run_scraper(
    client: Client,
    settings: ScrapeSettings,
    url: Option<&str>,
    tag: Option<&str>,
) -> Result<()> {
    let mut session = TerminalSession::start()?;
    let mut screen = ScrapeScreen::new(url, tag);
    info!("Scraper started");

    loop {
        session.terminal.draw(|frame| screen.draw(frame))?;
        let Some(event) = next_event()? else {
            continue;
        };
        match screen.handle_event(event) {
            ScrapeEffect::None => {}
            ScrapeEffect::Quit => break,
            ScrapeEffect::Scrape(request) => {
                // Show the in-progress line before blocking on the request.
                session.terminal.draw(|frame| screen.draw(frame))?;
                let dialog =
                    scrape::scrape_into(&client, settings.timeout, &request, screen.output_mut())
                        .await;
                screen.show_dialog(dialog);
                if let Some(dialog) = screen.dialog() {
                    debug!(title = %dialog.title, "Showing dialog");
                }
                debug!(chars = screen.output().text().char_len(), "Scrape rendered");
            }
        }
    }

    info!("Scraper closed");
    Ok(())
}
