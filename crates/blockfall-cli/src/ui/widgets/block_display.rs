use blockfall_engine::{Block, PieceKind};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::ui::widgets::{color, style};

/// One board cell: a style plus a centred symbol.
#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn empty(show_dots: bool) -> Self {
        if show_dots {
            Self::new(style::EMPTY_DOT, ".")
        } else {
            Self::new(style::EMPTY, "")
        }
    }

    pub const fn ghost() -> Self {
        Self::new(style::GHOST, "[]")
    }

    pub const fn piece(kind: PieceKind) -> Self {
        let color = color::from_piece(kind.color());
        Self::new(Style::new().fg(color).bg(color), "")
    }

    pub const fn from_block(block: Block, show_dots: bool) -> Self {
        match block {
            Block::Empty => Self::empty(show_dots),
            Block::Piece(kind) => Self::piece(kind),
        }
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
