use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    block_display::*, board_display::*, key_binding_display::*, piece_display::*,
    piece_stack_display::*, session_display::*, session_stats_display::*,
};

mod block_display;
mod board_display;
mod key_binding_display;
mod piece_display;
mod piece_stack_display;
mod session_display;
mod session_stats_display;

/// Terminal cells used to draw one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u16,
    pub height: u16,
}

impl Default for CellSize {
    fn default() -> Self {
        Self::from_scale(1.0)
    }
}

impl CellSize {
    /// Terminal characters are about twice as tall as wide, so a cell is two
    /// columns per row at scale 1.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_scale(scale: f64) -> Self {
        let cells = |n: f64| n.round().clamp(1.0, f64::from(u16::MAX)) as u16;
        Self {
            width: cells(2.0 * scale),
            height: cells(scale),
        }
    }
}

mod color {
    use blockfall_engine::PieceColor;
    use ratatui::style::Color;

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(60, 60, 60);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    pub const fn from_piece(color: PieceColor) -> Color {
        Color::Rgb(color.r, color.g, color.b)
    }
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = fg_bg(color::BLACK, color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::DARK_GRAY, color::BLACK);
    pub const GHOST: Style = fg_bg(color::GRAY, color::BLACK);
    pub const PAUSED: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const GAME_OVER: Style = fg_bg(color::WHITE, color::RED);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}

/// Renders `buf` as plain text, one line per row.
#[cfg(test)]
fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut text = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            text.push_str(buf[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size_from_scale() {
        assert_eq!(CellSize::from_scale(1.0), CellSize { width: 2, height: 1 });
        assert_eq!(CellSize::from_scale(2.0), CellSize { width: 4, height: 2 });
        assert_eq!(CellSize::from_scale(1.6), CellSize { width: 3, height: 2 });
        assert_eq!(CellSize::from_scale(0.1), CellSize { width: 1, height: 1 });
    }
}
