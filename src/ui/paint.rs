use std::io::Write;

use crossterm::style::{Attribute, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::{queue, style};

use crate::ui::span::SpanLine;
use crate::ui::style::Color;

fn terminal_color(color: Color) -> style::Color {
    match color {
        Color::Reset => style::Color::Reset,
        Color::Red => style::Color::Red,
        Color::Green => style::Color::Green,
        Color::Yellow => style::Color::Yellow,
        Color::Blue => style::Color::Blue,
        Color::Magenta => style::Color::Magenta,
        Color::Cyan => style::Color::Cyan,
        Color::White => style::Color::White,
        Color::DarkGrey => style::Color::DarkGrey,
    }
}

/// Paints span lines at the current cursor position. Assumes raw mode, so
/// each line ends with an explicit carriage return.
pub fn paint_lines(out: &mut impl Write, lines: &[SpanLine]) -> std::io::Result<()> {
    for line in lines {
        for span in line {
            if span.style.bold {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            if let Some(color) = span.style.color {
                queue!(out, SetForegroundColor(terminal_color(color)))?;
            }
            if let Some(color) = span.style.background {
                queue!(out, SetBackgroundColor(terminal_color(color)))?;
            }
            queue!(out, style::Print(span.text.as_str()))?;
            queue!(out, SetAttribute(Attribute::Reset))?;
        }
        queue!(out, style::Print("\r\n"))?;
    }
    out.flush()
}
