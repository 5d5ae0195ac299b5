use std::time::Duration;

use blockfall_engine::{QUEUE_LEN, SessionSnapshot, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Color,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{
    BoardDisplay, CellSize, PieceDisplay, PieceStackDisplay, SessionStatsDisplay, color, style,
};

/// The whole play screen: hold, stats, board and the next-piece queue.
///
/// The border colour follows the session state, and paused or finished
/// sessions get a banner across the board.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    snapshot: &'a SessionSnapshot,
    elapsed: Duration,
    cell_size: CellSize,
    show_ghost: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(snapshot: &'a SessionSnapshot, elapsed: Duration, cell_size: CellSize) -> Self {
        Self {
            snapshot,
            elapsed,
            cell_size,
            show_ghost: true,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    fn border_color(&self) -> Color {
        match self.snapshot.state {
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        }
    }

    fn panel(&self, title: &'a str) -> Block<'a> {
        Block::bordered()
            .title(Line::from(title).centered())
            .padding(Padding::symmetric(
                self.horizontal_padding,
                self.vertical_padding,
            ))
            .border_style(self.border_color())
            .style(style::DEFAULT)
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let snapshot = self.snapshot;

        let game_board = {
            let widget = BoardDisplay::new(&snapshot.board, self.cell_size)
                .active_piece(snapshot.active)
                .block(
                    Block::bordered()
                        .border_style(self.border_color())
                        .style(style::DEFAULT),
                );
            if self.show_ghost {
                widget.ghost(snapshot.ghost)
            } else {
                widget
            }
        };
        let hold_panel = {
            let panel = PieceDisplay::new(self.cell_size).block(self.panel("HOLD"));
            if let Some(piece) = snapshot.held {
                panel.piece(piece)
            } else {
                panel
            }
        };
        let piece_stack = PieceStackDisplay::new(
            snapshot.queue.iter().copied().take(QUEUE_LEN),
            self.cell_size,
        )
        .block(self.panel("NEXT"));
        let session_stats =
            SessionStatsDisplay::new(snapshot, self.elapsed).block(self.panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), session_stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(piece_stack.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(session_stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(session_stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);

        let [piece_stack_area] =
            Layout::vertical([Constraint::Length(piece_stack.height())]).areas(right_column);

        let game_board_width = game_board.width();
        hold_panel.render(hold_area, buf);
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        piece_stack.render(piece_stack_area, buf);

        let banner = match snapshot.state {
            SessionState::Playing => None,
            SessionState::Paused => Some((vec!["PAUSED"], style::PAUSED)),
            SessionState::GameOver => Some((
                vec!["GAME OVER", "Press R to play again"],
                style::GAME_OVER,
            )),
        };

        if let Some((lines, style)) = banner {
            let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
            let block = Block::new().style(style);
            let text = Text::from_iter(lines).style(style).centered();
            let area = board_area.centered(
                Constraint::Length(game_board_width),
                Constraint::Length(height + 2),
            );
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(height)), buf);
        }
    }
}
