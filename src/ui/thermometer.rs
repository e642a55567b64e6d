//! Vertical thermometer gauge.
//!
//! Fills bottom-up in proportion to a ratio clamped to `[0, 1]`, so a total far
//! past the target still draws a full tube and nothing more. The top row of the
//! tube carries the target marker and the raised amount sits in the middle of
//! the fill.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Widget},
};

#[derive(Debug, Clone)]
pub struct Thermometer<'a> {
    ratio: f64,
    label: String,
    block: Option<Block<'a>>,
    fill: Color,
    fill_top: Color,
    glass: Color,
    target_line: Color,
    label_color: Color,
}

impl<'a> Thermometer<'a> {
    pub fn new(ratio: f64) -> Self {
        Self {
            ratio: ratio.clamp(0.0, 1.0),
            label: String::new(),
            block: None,
            fill: Color::Red,
            fill_top: Color::LightRed,
            glass: Color::DarkGray,
            target_line: Color::Green,
            label_color: Color::White,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn fill_colors(mut self, fill: Color, fill_top: Color) -> Self {
        self.fill = fill;
        self.fill_top = fill_top;
        self
    }

    pub fn glass(mut self, glass: Color) -> Self {
        self.glass = glass;
        self
    }

    pub fn target_line(mut self, color: Color) -> Self {
        self.target_line = color;
        self
    }

    pub fn label_color(mut self, color: Color) -> Self {
        self.label_color = color;
        self
    }
}

/// Rows of a `height`-row tube that are filled at `ratio`
pub fn filled_rows(ratio: f64, height: u16) -> u16 {
    let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    ((ratio * height as f64).round() as u16).min(height)
}

impl Widget for Thermometer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.is_empty() {
            return;
        }

        let filled = filled_rows(self.ratio, inner.height);

        // row 0 is the bottom of the tube
        for row in 0..inner.height {
            let y = inner.bottom() - 1 - row;
            let bg = if row + 1 == filled {
                self.fill_top
            } else if row < filled {
                self.fill
            } else {
                self.glass
            };
            for x in inner.left()..inner.right() {
                buf[(x, y)].set_symbol(" ").set_style(Style::default().bg(bg));
            }
        }

        // Target marker across the top row
        for x in inner.left()..inner.right() {
            buf[(x, inner.top())]
                .set_symbol("▔")
                .set_fg(self.target_line);
        }

        if self.label.is_empty() {
            return;
        }

        // Centre of the fill, or the bottom row when nothing is filled yet
        let label_row = if filled == 0 { 0 } else { (filled - 1) / 2 };
        let y = inner.bottom() - 1 - label_row;
        let width = self.label.chars().count().min(inner.width as usize) as u16;
        let x = inner.left() + (inner.width - width) / 2;
        buf.set_stringn(
            x,
            y,
            &self.label,
            inner.width as usize,
            Style::default()
                .fg(self.label_color)
                .add_modifier(Modifier::BOLD),
        );
    }
}
