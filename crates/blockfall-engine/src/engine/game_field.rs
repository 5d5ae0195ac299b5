use crate::{
    GameConfig, IntentError, PieceSeed, SpawnCollisionError,
    core::{Board, LockDelay, Piece, PieceKind, Rotation, Side},
};

use super::piece_buffer::PieceBuffer;

/// Board, active piece, queue and hold slot.
///
/// The field enforces placement rules only; timing and scoring live in
/// [`GameSession`](super::GameSession). Every fallible operation leaves the
/// field untouched when it returns `Err`.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    active_piece: Piece,
    piece_buffer: PieceBuffer,
    can_hold: bool,
}

impl GameField {
    /// Creates an empty field and spawns the first piece.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Self {
        let board = Board::new(config.rows(), config.columns(), config.hidden_rows());
        let mut piece_buffer = PieceBuffer::with_seed(seed);
        let kind = piece_buffer.pop_next();
        // An empty board of at least the minimum size always fits a spawn.
        let active_piece = spawn_position(&board, kind).unwrap_or_else(|piece| piece);
        Self {
            board,
            active_piece,
            piece_buffer,
            can_hold: true,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> Piece {
        self.active_piece
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.piece_buffer.held_piece()
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.piece_buffer.next_pieces()
    }

    /// Returns whether hold has not been used since the last lock.
    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn set_lock_delay(&mut self, lock_delay: LockDelay) {
        self.active_piece.set_lock_delay(lock_delay);
    }

    pub fn try_move_side(&mut self, side: Side) -> Result<(), IntentError> {
        if !self.active_piece.can_move_side(&self.board, side) {
            return Err(IntentError::Blocked);
        }
        self.active_piece.move_side(side);
        Ok(())
    }

    pub fn try_move_down(&mut self) -> Result<(), IntentError> {
        if !self.active_piece.can_move_down(&self.board) {
            return Err(IntentError::Blocked);
        }
        self.active_piece.move_down();
        Ok(())
    }

    pub fn try_rotate(&mut self, rotation: Rotation) -> Result<(), IntentError> {
        if !self.active_piece.can_rotate(&self.board, rotation) {
            return Err(IntentError::Blocked);
        }
        self.active_piece.rotate(rotation);
        Ok(())
    }

    /// Drops the active piece as far as it goes, returning the rows travelled.
    pub fn hard_drop(&mut self) -> usize {
        self.active_piece.hard_drop_to(&self.board)
    }

    /// Returns the piece that hold would bring into play, at its spawn
    /// position.
    ///
    /// `None` when hold is unavailable or the piece cannot be placed.
    #[must_use]
    pub fn peek_active_piece_after_hold(&self) -> Option<Piece> {
        if !self.can_hold {
            return None;
        }
        spawn_position(&self.board, self.piece_buffer.peek_hold_result()).ok()
    }

    /// Moves the active piece into the hold slot.
    ///
    /// The incoming piece (the previously held one, or the front of the
    /// queue on the first hold) is placed like a fresh spawn. The outgoing
    /// piece is stored by kind only, so it comes back in spawn orientation.
    pub fn try_hold(&mut self) -> Result<(), IntentError> {
        if !self.can_hold {
            return Err(IntentError::HoldUnavailable);
        }
        let incoming = self
            .peek_active_piece_after_hold()
            .ok_or(IntentError::Blocked)?;
        let kind = self.piece_buffer.hold(self.active_piece.kind());
        debug_assert_eq!(kind, incoming.kind());
        self.active_piece = incoming;
        self.can_hold = false;
        Ok(())
    }

    /// Commits the active piece, clears full rows and spawns the next piece.
    ///
    /// Returns the number of cleared rows, and whether the next piece found
    /// room. On a spawn collision the new piece stays where the last attempt
    /// left it.
    pub fn complete_piece_drop(&mut self) -> (usize, Result<(), SpawnCollisionError>) {
        self.board
            .commit(&self.active_piece.cells(), self.active_piece.kind());
        self.can_hold = true;

        let full_rows = self.board.detect_full_rows();
        self.board.clear_rows(&full_rows);

        (full_rows.len(), self.spawn_next())
    }

    /// Clears the board, the hold slot and the queue, then spawns a piece.
    pub fn reset(&mut self) -> Result<(), SpawnCollisionError> {
        self.board.clear();
        self.piece_buffer.reset();
        self.can_hold = true;
        self.spawn_next()
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_active_piece(&mut self, piece: Piece) -> Result<(), IntentError> {
        if !self.board.can_place(&piece.cells()) {
            return Err(IntentError::Blocked);
        }
        self.active_piece = piece;
        Ok(())
    }

    fn spawn_next(&mut self) -> Result<(), SpawnCollisionError> {
        let kind = self.piece_buffer.pop_next();
        match spawn_position(&self.board, kind) {
            Ok(piece) => {
                self.active_piece = piece;
                Ok(())
            }
            Err(piece) => {
                self.active_piece = piece;
                Err(SpawnCollisionError)
            }
        }
    }
}

/// Places `kind` at the spawn point, escaping upward through the hidden rows.
///
/// The piece starts at the top of the visible area, horizontally centred.
/// If that collides it is raised one row at a time, at most `hidden_rows`
/// times. `Err` carries the last attempted position.
pub(crate) fn spawn_position(board: &Board, kind: PieceKind) -> Result<Piece, Piece> {
    let column_shift = i32::try_from(board.columns() / 2).unwrap_or(0) - 1;
    let row_shift = i32::try_from(board.hidden_rows()).unwrap_or(0);
    let mut piece = Piece::spawned(kind, column_shift, row_shift);
    if board.can_place(&piece.cells()) {
        return Ok(piece);
    }
    for _ in 0..board.hidden_rows() {
        piece.move_up();
        if board.can_place(&piece.cells()) {
            return Ok(piece);
        }
    }
    Err(piece)
}
