//! Drawing helpers and screen-to-buffer geometry shared by both screens.

use super::input::InputField;
use super::theme::{accent, dialog_border, style_for};
use crate::output::{StyledText, TextStyle};
use crate::scrape::Dialog;
use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    area.contains(Position::new(column, row))
}

/// Index of the character drawn at display `column` of `line`; columns past
/// the end map to the line length.
pub fn column_to_char(line: &str, column: usize) -> usize {
    let mut x = 0;
    for (i, c) in line.chars().enumerate() {
        let w = c.width().unwrap_or(0);
        if column < x + w {
            return i;
        }
        x += w;
    }
    line.chars().count()
}

/// Buffer offset under a terminal cell of the output area.
///
/// `inner` is the text area inside the border and `scroll` the index of the
/// first visible line. Rows map 1:1 to buffer lines.
pub fn offset_under(
    text: &StyledText,
    inner: Rect,
    scroll: usize,
    column: u16,
    row: u16,
) -> Option<usize> {
    if !contains(inner, column, row) {
        return None;
    }
    let line_idx = scroll + usize::from(row - inner.y);
    let line = text.line(line_idx)?;
    let col = column_to_char(line, usize::from(column - inner.x));
    text.offset_at(line_idx, col)
}

/// Largest scroll position that still fills `visible` rows.
pub fn max_scroll(text: &StyledText, visible: u16) -> usize {
    text.line_starts().len().saturating_sub(usize::from(visible))
}

/// Render the output buffer; titles on `hover_row` are underlined.
pub fn output_lines(text: &StyledText, hover_row: Option<usize>) -> Vec<Line<'_>> {
    text.styled_lines()
        .into_iter()
        .enumerate()
        .map(|(row, runs)| {
            let spans: Vec<Span<'_>> = runs
                .into_iter()
                .map(|(run, style)| {
                    let mut rendered = style_for(style);
                    if style == TextStyle::Title && hover_row == Some(row) {
                        rendered = rendered.add_modifier(Modifier::UNDERLINED);
                    }
                    Span::styled(run, rendered)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

pub fn draw_output(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    text: &StyledText,
    scroll: usize,
    hover_row: Option<usize>,
) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(Span::styled(format!(" {title} "), accent()));
    let offset = u16::try_from(scroll).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(output_lines(text, hover_row))
        .block(block)
        .scroll((offset, 0));
    frame.render_widget(paragraph, area);
}

/// Horizontal scroll that keeps the cursor of `field` visible in `width` cells.
pub fn input_scroll(field: &InputField, width: u16) -> usize {
    let before: String = field.value().chars().take(field.cursor()).collect();
    before.width().saturating_sub(usize::from(width.saturating_sub(1)))
}

/// Character index for a click at `column` on a drawn input field.
pub fn input_click(field: &InputField, area: Rect, column: u16) -> usize {
    let inner = Block::bordered().inner(area);
    let scroll = input_scroll(field, inner.width);
    let rel = usize::from(column.saturating_sub(inner.x));
    column_to_char(field.value(), rel + scroll)
}

pub fn draw_input(frame: &mut Frame, area: Rect, title: &str, field: &InputField, focused: bool) {
    let border = if focused { accent() } else { Style::default() };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(format!(" {title} "));
    let inner = block.inner(area);
    let scroll = input_scroll(field, inner.width);
    let paragraph = Paragraph::new(field.value())
        .block(block)
        .scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX)));
    frame.render_widget(paragraph, area);

    if focused {
        let before: String = field.value().chars().take(field.cursor()).collect();
        let x = before.width().saturating_sub(scroll);
        let x = inner.x + u16::try_from(x).unwrap_or(inner.width).min(inner.width);
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

pub fn draw_button(frame: &mut Frame, area: Rect, label: &str) {
    let paragraph = Paragraph::new(Span::styled(label, accent()))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_type(BorderType::Rounded));
    frame.render_widget(paragraph, area);
}

/// Centered rectangle of at most `width` x `height` cells inside `area`.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Draw `dialog` as a modal box over the whole frame.
pub fn draw_dialog(frame: &mut Frame, dialog: &Dialog) {
    let area = frame.area();
    let width = area.width.saturating_sub(8).min(72);
    let text_width = usize::from(width.saturating_sub(4)).max(1);
    let message_rows = dialog
        .message
        .lines()
        .map(|l| l.width().div_ceil(text_width).max(1))
        .sum::<usize>();
    let height = u16::try_from(message_rows + 4).unwrap_or(u16::MAX);
    let rect = centered_rect(area, width, height);

    let mut lines: Vec<Line<'_>> = dialog.message.lines().map(Line::from).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter to dismiss",
        Style::default().add_modifier(Modifier::DIM),
    )));
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::bordered()
                .border_type(BorderType::Double)
                .border_style(dialog_border(dialog.severity))
                .title(format!(" {} ", dialog.title)),
        );
    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}

pub fn draw_footer(frame: &mut Frame, area: Rect, text: &str) {
    let paragraph = Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::DIM),
    ));
    frame.render_widget(paragraph, area);
}
