use blockfall_engine::{Block, PieceKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{BlockDisplay, CellSize};

/// A single piece in spawn orientation, centred in a 4x2 cell box.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    cell_size: CellSize,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new(cell_size: CellSize) -> Self {
        Self {
            piece: None,
            cell_size,
            block: None,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        self.cell_size
            .width
            .saturating_mul(4)
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        self.cell_size
            .height
            .saturating_mul(2)
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let CellSize { width, height } = self.cell_size;
        let (cols, rows) = self.piece.map_or((0, 0), |piece| {
            let (w, h) = piece.size();
            (
                u16::try_from(w).unwrap_or(0),
                u16::try_from(h).unwrap_or(0),
            )
        });
        let piece_area = area.centered(
            Constraint::Length(cols.saturating_mul(width)),
            Constraint::Length(rows.saturating_mul(height)),
        );

        let horizontal =
            Layout::horizontal((0..cols).map(|_| Constraint::Length(width))).flex(Flex::Center);
        let vertical = Layout::vertical((0..rows).map(|_| Constraint::Length(height)));
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let Some(piece) = self.piece else {
            return;
        };
        let empty_block = BlockDisplay::from_block(Block::Empty, false);
        let occupied_block = BlockDisplay::piece(piece);
        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                if piece.is_occupied((x, y)) {
                    Widget::render(&occupied_block, grid_cell, buf);
                } else {
                    Widget::render(&empty_block, grid_cell, buf);
                }
            }
        }
    }
}
