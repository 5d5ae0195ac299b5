use std::iter;

use blockfall_engine::{Board, PieceView};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::{BlockDisplay, CellSize};

/// The visible part of the board with the active and ghost pieces on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<PieceView>,
    active_piece: Option<PieceView>,
    cell_size: CellSize,
    block: Option<BlockWidget<'a>>,
}

/// What to draw in one visible cell.
#[derive(Debug, Clone, Copy)]
enum CellContent {
    Board(blockfall_engine::Block),
    Ghost,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board, cell_size: CellSize) -> Self {
        Self {
            board,
            ghost: None,
            active_piece: None,
            cell_size,
            block: None,
        }
    }

    pub fn ghost(self, piece: PieceView) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn active_piece(self, piece: PieceView) -> Self {
        Self {
            active_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn columns(&self) -> u16 {
        u16::try_from(self.board.columns()).unwrap_or(u16::MAX)
    }

    fn rows(&self) -> u16 {
        u16::try_from(self.board.visible_rows()).unwrap_or(u16::MAX)
    }

    pub fn width(&self) -> u16 {
        self.columns()
            .saturating_mul(self.cell_size.width)
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        self.rows()
            .saturating_mul(self.cell_size.height)
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }

    /// Visible cells, top row first, with the pieces overlaid.
    fn cells(&self) -> Vec<Vec<CellContent>> {
        let mut cells: Vec<Vec<_>> = self
            .board
            .visible()
            .map(|row| row.iter().map(|b| CellContent::Board(*b)).collect())
            .collect();
        let hidden = self.board.hidden_rows();
        let mut overlay = |piece: PieceView, content: CellContent| {
            for p in piece.cells {
                let (Ok(x), Ok(y)) = (usize::try_from(p.x), usize::try_from(p.y)) else {
                    continue;
                };
                if let Some(cell) = y
                    .checked_sub(hidden)
                    .and_then(|y| cells.get_mut(y))
                    .and_then(|row| row.get_mut(x))
                {
                    *cell = content;
                }
            }
        };
        if let Some(ghost) = self.ghost {
            overlay(ghost, CellContent::Ghost);
        }
        if let Some(piece) = self.active_piece {
            overlay(
                piece,
                CellContent::Board(blockfall_engine::Block::Piece(piece.kind)),
            );
        }
        cells
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.columns()).map(|_| Constraint::Length(self.cell_size.width));
        let row_constraints = (0..self.rows()).map(|_| Constraint::Length(self.cell_size.height));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.cells()) {
            for (grid_cell, content) in iter::zip(grid_row, row) {
                let block_display = match content {
                    CellContent::Board(block) => BlockDisplay::from_block(block, true),
                    CellContent::Ghost => BlockDisplay::ghost(),
                };
                block_display.render(grid_cell, buf);
            }
        }
    }
}
