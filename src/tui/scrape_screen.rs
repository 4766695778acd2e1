//! Scraper screen: URL and tag fields, scrape/reset buttons, results, dialogs.

use super::input::InputField;
use super::view;
use crate::output::OutputRegion;
use crate::scrape::{
    self, DEFAULT_URL, Dialog, ScrapeRequest, begin_scrape, reset_output, validate_input,
};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};

const HELP: &str = "Enter: scrape  Tab: switch field  Ctrl-R: refresh inputs  PgUp/PgDn: scroll  Esc: quit";
const WHEEL_STEP: isize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeEffect {
    None,
    /// Input is valid and the output shows the in-progress line.
    Scrape(ScrapeRequest),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Url,
    Tag,
}

#[derive(Debug, Default, Clone, Copy)]
struct ScrapeLayout {
    url: Rect,
    tag: Rect,
    scrape_button: Rect,
    reset_button: Rect,
    output: Rect,
    output_inner: Rect,
}

#[derive(Debug)]
pub struct ScrapeScreen {
    url: InputField,
    tag: InputField,
    focus: Focus,
    output: OutputRegion,
    dialog: Option<Dialog>,
    scroll: usize,
    layout: ScrapeLayout,
}

impl ScrapeScreen {
    pub fn new(url: Option<&str>, tag: Option<&str>) -> Self {
        let tag = InputField::new(tag.unwrap_or_default());
        Self {
            url: InputField::new(url.unwrap_or(DEFAULT_URL)),
            focus: if tag.value().is_empty() {
                Focus::Tag
            } else {
                Focus::Url
            },
            tag,
            output: OutputRegion::new(scrape::welcome_output()),
            dialog: None,
            scroll: 0,
            layout: ScrapeLayout::default(),
        }
    }

    pub fn output(&self) -> &OutputRegion {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut OutputRegion {
        &mut self.output
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn show_dialog(&mut self, dialog: Option<Dialog>) {
        if dialog.is_some() {
            self.dialog = dialog;
        }
    }

    /// Validate the fields; on success the output switches to the
    /// in-progress line and the request is handed to the event loop.
    pub fn submit(&mut self) -> ScrapeEffect {
        match validate_input(self.url.value(), self.tag.value()) {
            Ok(request) => {
                info!(url = %request.url, tag = %request.tag, "Scrape requested");
                begin_scrape(&mut self.output, &request);
                self.scroll = 0;
                ScrapeEffect::Scrape(request)
            }
            Err(e) => {
                warn!(error = %e, "Rejected scrape input");
                self.dialog = Some(e.dialog());
                ScrapeEffect::None
            }
        }
    }

    /// Restore the default URL, clear the tag and show the refresh message.
    pub fn reset(&mut self) {
        self.url.set(DEFAULT_URL);
        self.tag.clear();
        self.focus = Focus::Tag;
        self.scroll = 0;
        reset_output(&mut self.output);
    }

    pub fn handle_event(&mut self, event: Event) -> ScrapeEffect {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if self.dialog.is_some() {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                        self.dialog = None;
                    }
                    return ScrapeEffect::None;
                }
                self.handle_key(key)
            }
            Event::Mouse(mouse) => {
                if self.dialog.is_some() {
                    if matches!(mouse.kind, MouseEventKind::Down(_)) {
                        self.dialog = None;
                    }
                    return ScrapeEffect::None;
                }
                self.handle_mouse(mouse)
            }
            _ => ScrapeEffect::None,
        }
    }

    fn focused_mut(&mut self) -> &mut InputField {
        match self.focus {
            Focus::Url => &mut self.url,
            Focus::Tag => &mut self.tag,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> ScrapeEffect {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let page = isize::try_from(self.layout.output_inner.height.max(1)).unwrap_or(isize::MAX);
        match key.code {
            KeyCode::Esc => return ScrapeEffect::Quit,
            KeyCode::Char('c') if ctrl => return ScrapeEffect::Quit,
            KeyCode::Char('r') if ctrl => self.reset(),
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Url => Focus::Tag,
                    Focus::Tag => Focus::Url,
                };
            }
            KeyCode::PageUp => self.scroll_by(-page),
            KeyCode::PageDown => self.scroll_by(page),
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            _ => {
                self.focused_mut().handle_key(key);
            }
        }
        ScrapeEffect::None
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> ScrapeEffect {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if view::contains(self.layout.scrape_button, column, row) {
                    return self.submit();
                }
                if view::contains(self.layout.reset_button, column, row) {
                    self.reset();
                } else if view::contains(self.layout.url, column, row) {
                    self.focus = Focus::Url;
                    let at = view::input_click(&self.url, self.layout.url, column);
                    self.url.move_to(at);
                } else if view::contains(self.layout.tag, column, row) {
                    self.focus = Focus::Tag;
                    let at = view::input_click(&self.tag, self.layout.tag, column);
                    self.tag.move_to(at);
                }
            }
            MouseEventKind::ScrollUp if view::contains(self.layout.output, column, row) => {
                self.scroll_by(-WHEEL_STEP);
            }
            MouseEventKind::ScrollDown if view::contains(self.layout.output, column, row) => {
                self.scroll_by(WHEEL_STEP);
            }
            _ => {}
        }
        ScrapeEffect::None
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = view::max_scroll(self.output.text(), self.layout.output_inner.height);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let [url, tag_row, buttons, heading, output, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [tag, _] =
            Layout::horizontal([Constraint::Length(32), Constraint::Min(0)]).areas(tag_row);
        let [scrape_button, reset_button] =
            Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(buttons);

        self.layout = ScrapeLayout {
            url,
            tag,
            scrape_button,
            reset_button,
            output,
            output_inner: Block::bordered().inner(output),
        };
        let max = view::max_scroll(self.output.text(), self.layout.output_inner.height);
        self.scroll = self.scroll.min(max);

        let editing = self.dialog.is_none();
        view::draw_input(
            frame,
            url,
            "Target URL",
            &self.url,
            editing && self.focus == Focus::Url,
        );
        view::draw_input(
            frame,
            tag,
            "HTML Tag (e.g., h1, p)",
            &self.tag,
            editing && self.focus == Focus::Tag,
        );
        view::draw_button(frame, scrape_button, "SCRAPE CONTENT");
        view::draw_button(frame, reset_button, "REFRESH INPUTS");
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Scraping Results:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            heading,
        );
        view::draw_output(frame, output, "Results", self.output.text(), self.scroll, None);
        view::draw_footer(frame, footer, HELP);

        if let Some(dialog) = &self.dialog {
            view::draw_dialog(frame, dialog);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::Severity;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn type_text(screen: &mut ScrapeScreen, text: &str) {
        for c in text.chars() {
            screen.handle_event(key(KeyCode::Char(c)));
        }
    }

    fn drawn(mut screen: ScrapeScreen) -> ScrapeScreen {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| screen.draw(frame)).unwrap();
        screen
    }

    #[test]
    fn test_page_keys_scroll_by_visible_height() {
        let mut screen = ScrapeScreen::new(None, Some("p"));
        {
            let mut writer = screen.output_mut().begin_update();
            writer.clear();
            for i in 0..60 {
                writer.push(&format!("line {i}\n"), crate::output::TextStyle::Body);
            }
        }
        let mut screen = drawn(screen);

        let page = usize::from(screen.layout.output_inner.height);
        assert!(page > 0);
        screen.handle_event(key(KeyCode::PageDown));
        assert_eq!(screen.scroll, page);
        screen.handle_event(key(KeyCode::PageDown));
        assert_eq!(screen.scroll, 2 * page);
        screen.handle_event(key(KeyCode::PageUp));
        assert_eq!(screen.scroll, page);
    }

    #[test]
    fn test_initial_state() {
        let screen = ScrapeScreen::new(None, None);
        assert_eq!(screen.url.value(), DEFAULT_URL);
        assert_eq!(screen.focus, Focus::Tag);
        assert!(screen.output().text().as_str().starts_with("Welcome to the Advanced Scraper."));
        assert!(!screen.output().is_writable());
    }

    #[test]
    fn test_enter_with_valid_input_starts_scrape() {
        let mut screen = ScrapeScreen::new(None, None);
        type_text(&mut screen, "h1");

        let effect = screen.handle_event(key(KeyCode::Enter));
        assert_eq!(
            effect,
            ScrapeEffect::Scrape(ScrapeRequest {
                url: DEFAULT_URL.to_string(),
                tag: "h1".to_string(),
            })
        );
        assert_eq!(
            screen.output().text().as_str(),
            "Scraping https://old.reddit.com/ for tag <h1>...\n"
        );
    }

    #[test]
    fn test_missing_tag_shows_warning_and_keeps_output() {
        let mut screen = ScrapeScreen::new(None, None);
        let before = screen.output().text().clone();

        assert_eq!(screen.handle_event(key(KeyCode::Enter)), ScrapeEffect::None);
        let dialog = screen.dialog().expect("warning dialog");
        assert_eq!(dialog.severity, Severity::Warning);
        assert_eq!(dialog.title, "Input Required");
        assert_eq!(screen.output().text(), &before);
    }

    #[test]
    fn test_schemeless_url_is_rejected() {
        let mut screen = ScrapeScreen::new(Some("example.com"), Some("p"));
        let before = screen.output().text().clone();

        assert_eq!(screen.submit(), ScrapeEffect::None);
        assert_eq!(screen.dialog().map(|d| d.title.as_str()), Some("Invalid URL"));
        assert_eq!(screen.output().text(), &before);
    }

    #[test]
    fn test_dialog_blocks_input_until_dismissed() {
        let mut screen = ScrapeScreen::new(Some("example.com"), Some("p"));
        screen.submit();

        assert_eq!(screen.handle_event(key(KeyCode::Char('x'))), ScrapeEffect::None);
        assert_eq!(screen.handle_event(key(KeyCode::Esc)), ScrapeEffect::None);
        assert!(screen.dialog().is_none());
        assert_eq!(screen.tag.value(), "p");
        assert_eq!(screen.url.value(), "example.com");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut screen = ScrapeScreen::new(Some("https://example.com"), Some("div"));
        screen.submit();

        screen.handle_event(ctrl('r'));
        assert_eq!(screen.url.value(), DEFAULT_URL);
        assert_eq!(screen.tag.value(), "");
        assert_eq!(
            screen.output().text().as_str(),
            "Input fields refreshed. Default URL set to: https://old.reddit.com/\nReady to scrape!"
        );
        assert!(!screen.output().is_writable());
    }

    #[test]
    fn test_tab_switches_focus() {
        let mut screen = ScrapeScreen::new(None, None);
        screen.handle_event(key(KeyCode::Tab));
        assert_eq!(screen.focus, Focus::Url);
        screen.handle_event(ctrl('u'));
        type_text(&mut screen, "https://example.com");
        assert_eq!(screen.url.value(), "https://example.com");
    }

    #[test]
    fn test_buttons_by_mouse() {
        let mut screen = drawn(ScrapeScreen::new(Some("https://example.com"), Some("p")));

        let button = screen.layout.scrape_button;
        assert!(matches!(
            screen.handle_event(click(button.x + 3, button.y + 1)),
            ScrapeEffect::Scrape(_)
        ));

        let reset = screen.layout.reset_button;
        assert_eq!(
            screen.handle_event(click(reset.x + 3, reset.y + 1)),
            ScrapeEffect::None
        );
        assert_eq!(screen.url.value(), DEFAULT_URL);
        assert_eq!(screen.tag.value(), "");
    }

    #[test]
    fn test_click_focuses_field() {
        let mut screen = drawn(ScrapeScreen::new(None, Some("p")));
        assert_eq!(screen.focus, Focus::Url);

        let tag = screen.layout.tag;
        screen.handle_event(click(tag.x + 1, tag.y + 1));
        assert_eq!(screen.focus, Focus::Tag);
        assert_eq!(screen.tag.cursor(), 0);
    }

    #[test]
    fn test_show_dialog_ignores_none() {
        let mut screen = ScrapeScreen::new(Some("example.com"), Some("p"));
        screen.submit();
        screen.show_dialog(None);
        assert!(screen.dialog().is_some());
    }
}
