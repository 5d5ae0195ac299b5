use serde::Serialize;

use crate::core::{Board, Coord, Piece, PieceKind};

use super::session::SessionState;

/// Projects `piece` straight down to where a hard drop would leave it.
///
/// Works on a copy; the input piece is never modified.
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind, ghost_piece};
///
/// let board = Board::new(20, 10, 2);
/// let piece = Piece::spawned(PieceKind::O, 4, 2);
/// let ghost = ghost_piece(&piece, &board);
/// assert!(!ghost.can_move_down(&board));
/// assert_eq!(piece, Piece::spawned(PieceKind::O, 4, 2));
/// ```
#[must_use]
pub fn ghost_piece(piece: &Piece, board: &Board) -> Piece {
    let mut ghost = *piece;
    ghost.hard_drop_to(board);
    ghost
}

/// Kind and absolute cells of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceView {
    pub kind: PieceKind,
    pub cells: [Coord; 4],
}

impl From<Piece> for PieceView {
    fn from(piece: Piece) -> Self {
        Self {
            kind: piece.kind(),
            cells: piece.cells(),
        }
    }
}

/// Owned, read-only copy of everything a renderer needs.
///
/// Produced by [`GameSession::snapshot`](super::GameSession::snapshot) after
/// a completed tick or intent, so it never shows a half-applied change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub board: Board,
    pub active: PieceView,
    pub ghost: PieceView,
    pub held: Option<PieceKind>,
    pub can_hold: bool,
    pub queue: Vec<PieceKind>,
    pub score: usize,
    pub level: usize,
    pub lines: usize,
    /// Locks by number of rows cleared, index 0 to 4.
    pub line_clears: [usize; 5],
    pub completed_pieces: usize,
    pub ticks: u64,
    pub state: SessionState,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }
}
