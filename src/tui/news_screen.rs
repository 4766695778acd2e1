//! Headline viewer screen: query field, "Get News" button, clickable output.

use super::input::InputField;
use super::view;
use crate::news::{NewsOutcome, render_news};
use crate::output::{CursorStyle, OutputRegion, resolve_click, resolve_hover};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph};

const PROMPT: &str = "What type of news are you interested in?";
const HELP: &str = "Enter: get news  Click headline: open  PgUp/PgDn: scroll  Esc: quit";
const WHEEL_STEP: isize = 3;

/// What the event loop should do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsEffect {
    None,
    /// Search for the raw query text.
    Fetch(String),
    OpenUrl(String),
    /// The pointer moved onto or off a headline.
    SetPointer(CursorStyle),
    Quit,
}

#[derive(Debug, Default, Clone, Copy)]
struct NewsLayout {
    input: Rect,
    button: Rect,
    output: Rect,
    output_inner: Rect,
}

#[derive(Debug)]
pub struct NewsScreen {
    query: InputField,
    output: OutputRegion,
    scroll: usize,
    pointer: CursorStyle,
    hover_row: Option<usize>,
    busy: bool,
    layout: NewsLayout,
}

impl NewsScreen {
    pub fn new(initial_query: &str) -> Self {
        Self {
            query: InputField::new(initial_query),
            output: OutputRegion::default(),
            scroll: 0,
            pointer: CursorStyle::Arrow,
            hover_row: None,
            busy: false,
            layout: NewsLayout::default(),
        }
    }

    pub fn output(&self) -> &OutputRegion {
        &self.output
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// Replace the output with the rendering of `outcome`.
    pub fn apply(&mut self, outcome: &NewsOutcome) {
        self.output.begin_update().replace(render_news(outcome));
        self.scroll = 0;
        self.hover_row = None;
    }

    pub fn handle_event(&mut self, event: Event) -> NewsEffect {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => NewsEffect::None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> NewsEffect {
        if key.kind != KeyEventKind::Press {
            return NewsEffect::None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let page = isize::try_from(self.layout.output_inner.height.max(1)).unwrap_or(isize::MAX);
        match key.code {
            KeyCode::Esc => return NewsEffect::Quit,
            KeyCode::Char('c') if ctrl => return NewsEffect::Quit,
            KeyCode::Enter => return NewsEffect::Fetch(self.query.value().to_string()),
            KeyCode::PageUp => self.scroll_by(-page),
            KeyCode::PageDown => self.scroll_by(page),
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            _ => {
                self.query.handle_key(key);
            }
        }
        NewsEffect::None
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> NewsEffect {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => {
                let offset = self.offset_under(column, row);
                let pointer = resolve_hover(offset, self.output.text());
                self.hover_row = match pointer {
                    CursorStyle::Pointer => Some(self.row_under(row)),
                    CursorStyle::Arrow => None,
                };
                if pointer != self.pointer {
                    self.pointer = pointer;
                    return NewsEffect::SetPointer(pointer);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if view::contains(self.layout.button, column, row) {
                    return NewsEffect::Fetch(self.query.value().to_string());
                }
                if view::contains(self.layout.input, column, row) {
                    let at = view::input_click(&self.query, self.layout.input, column);
                    self.query.move_to(at);
                    return NewsEffect::None;
                }
                if let Some(url) = self
                    .offset_under(column, row)
                    .and_then(|offset| resolve_click(offset, self.output.spans()))
                {
                    return NewsEffect::OpenUrl(url.to_string());
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
        NewsEffect::None
    }

    fn offset_under(&self, column: u16, row: u16) -> Option<usize> {
        view::offset_under(
            self.output.text(),
            self.layout.output_inner,
            self.scroll,
            column,
            row,
        )
    }

    fn row_under(&self, row: u16) -> usize {
        self.scroll + usize::from(row.saturating_sub(self.layout.output_inner.y))
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = view::max_scroll(self.output.text(), self.layout.output_inner.height);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let [prompt, controls, output, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [input, button] =
            Layout::horizontal([Constraint::Min(10), Constraint::Length(14)]).areas(controls);

        self.layout = NewsLayout {
            input,
            button,
            output,
            output_inner: Block::bordered().inner(output),
        };
        let max = view::max_scroll(self.output.text(), self.layout.output_inner.height);
        self.scroll = self.scroll.min(max);

        frame.render_widget(
            Paragraph::new(Span::styled(
                PROMPT,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            prompt,
        );
        view::draw_input(frame, input, "Topic", &self.query, true);
        view::draw_button(frame, button, "Get News");
        view::draw_output(
            frame,
            output,
            "Headlines",
            self.output.text(),
            self.scroll,
            self.hover_row,
        );
        let status = if self.busy { "Fetching news..." } else { HELP };
        view::draw_footer(frame, footer, status);
    }
}
