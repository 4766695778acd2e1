//! Colors for each output text style.

use crate::output::TextStyle;
use ratatui::style::{Color, Modifier, Style};

const CYAN: Color = Color::Rgb(0x00, 0xff, 0xea);
const ORANGE: Color = Color::Rgb(0xff, 0x98, 0x00);
const BLUE: Color = Color::Rgb(0x00, 0x7b, 0xff);
const GREEN: Color = Color::Rgb(0x28, 0xa7, 0x45);
const AMBER: Color = Color::Rgb(0xff, 0x6f, 0x00);
const RED: Color = Color::Rgb(0xdc, 0x35, 0x45);
const GRAY: Color = Color::Rgb(0x6c, 0x75, 0x7d);

pub fn style_for(style: TextStyle) -> Style {
    match style {
        TextStyle::Title => Style::default().fg(CYAN).add_modifier(Modifier::BOLD),
        TextStyle::Description => Style::default().fg(Color::White),
        TextStyle::Separator => Style::default().fg(ORANGE),
        TextStyle::Info => Style::default().fg(BLUE).add_modifier(Modifier::ITALIC),
        TextStyle::Success => Style::default().fg(GREEN).add_modifier(Modifier::BOLD),
        TextStyle::Warning => Style::default().fg(AMBER).add_modifier(Modifier::BOLD),
        TextStyle::Error => Style::default().fg(RED).add_modifier(Modifier::BOLD),
        TextStyle::Label => Style::default().fg(GRAY).add_modifier(Modifier::BOLD),
        TextStyle::Body => Style::default(),
    }
}

/// Accent for buttons and focused borders.
pub fn accent() -> Style {
    Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)
}

pub fn dialog_border(severity: crate::scrape::Severity) -> Style {
    match severity {
        crate::scrape::Severity::Warning => Style::default().fg(AMBER),
        crate::scrape::Severity::Error => Style::default().fg(RED),
    }
}
