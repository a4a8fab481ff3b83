//! Crossterm renderer: one colored terminal cell per sprite.

use std::io::{self, Write};

use crossterm::QueueableCommand;
use crossterm::cursor::MoveTo;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetForegroundColor};
use spriteboard_core::Renderer;
use spriteboard_protocol::{Position, SpriteRecord};
use tracing::warn;

/// Canvas pixels covered by one terminal cell. Cells are roughly twice as
/// tall as they are wide, so the vertical scale is doubled to keep the
/// scene's proportions.
const CELL_WIDTH_PX: i64 = 10;
const CELL_HEIGHT_PX: i64 = 20;

/// Fallback for sprites whose color string is not in the `hsl(...)` form.
const FALLBACK_RGB: (u8, u8, u8) = (190, 190, 190);

pub struct TermRenderer {
    out: io::Stdout,
}

impl Default for TermRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TermRenderer {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }

    /// Show a one-line message on the top row, e.g. a placement error.
    pub fn show_status(&mut self, text: &str) {
        let result = self
            .out
            .queue(MoveTo(0, 0))
            .and_then(|out| out.queue(ResetColor))
            .and_then(|out| out.queue(Print(text.to_string())))
            .and_then(|out| out.flush());
        if let Err(err) = result {
            warn!(%err, "failed to draw status line");
        }
    }

    fn try_draw(&mut self, sprite: &SpriteRecord) -> io::Result<()> {
        let (column, row) = position_to_cell(sprite.position);
        let (r, g, b) = sprite
            .color
            .hue()
            .map_or(FALLBACK_RGB, |hue| hsl_to_rgb(hue, 0.95, 0.5));

        self.out
            .queue(MoveTo(column, row))?
            .queue(SetForegroundColor(TermColor::Rgb { r, g, b }))?
            .queue(Print('█'))?
            .queue(ResetColor)?;
        self.out.flush()
    }
}

impl Renderer for TermRenderer {
    fn draw(&mut self, sprite: &SpriteRecord) {
        // Draw failures are background noise, not sync failures.
        if let Err(err) = self.try_draw(sprite) {
            warn!(%err, id = %sprite.id, "failed to draw sprite");
        }
    }
}

/// Map a canvas position to the terminal cell it falls in.
pub fn position_to_cell(position: Position) -> (u16, u16) {
    let column = (position.x / CELL_WIDTH_PX).clamp(0, i64::from(u16::MAX));
    let row = (position.y / CELL_HEIGHT_PX).clamp(0, i64::from(u16::MAX));
    (column as u16, row as u16)
}

/// Map a clicked terminal cell back to a canvas position (the cell's
/// top-left corner in pixels).
pub fn cell_to_position(column: u16, row: u16) -> Position {
    Position::new(
        i64::from(column) * CELL_WIDTH_PX,
        i64::from(row) * CELL_HEIGHT_PX,
    )
}

fn hsl_to_rgb(hue: u16, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let h = f64::from(hue % 360) / 60.0;
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}
