use serde::{Deserialize, Serialize};

use super::{board::Board, piece_kind::PieceKind};

/// Board coordinate.
///
/// # Coordinate System
///
/// - (0, 0) is the top-left cell of the board, hidden rows included
/// - X increases rightward (columns)
/// - Y increases downward (rows)
///
/// Coordinates are signed so that rotation and out-of-bounds candidates can be
/// represented before they are validated against a [`Board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Horizontal movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    const fn dx(self) -> i32 {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }
}

/// Rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// Rotates a pivot-relative point by 90 degrees.
    const fn apply(self, p: Coord) -> Coord {
        match self {
            Rotation::Clockwise => Coord::new(-p.y, p.x),
            Rotation::CounterClockwise => Coord::new(p.y, -p.x),
        }
    }
}

/// Lock-delay countdown carried by the active piece.
///
/// The piece only stores it; the session decides when it starts, advances
/// and expires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::IsVariant)]
pub enum LockDelay {
    /// Not grounded, no countdown running.
    #[default]
    Idle,
    /// Grounded, ticks remaining before the piece locks.
    Counting(u32),
    /// Countdown reached zero: the piece must lock.
    Expired,
}

impl LockDelay {
    /// Starts a countdown of `ticks`, or expires immediately for zero.
    #[must_use]
    pub const fn start(ticks: u32) -> Self {
        if ticks == 0 {
            LockDelay::Expired
        } else {
            LockDelay::Counting(ticks)
        }
    }

    /// Advances a running countdown by one tick.
    #[must_use]
    pub const fn advanced(self) -> Self {
        match self {
            LockDelay::Counting(ticks) => LockDelay::start(ticks.saturating_sub(1)),
            other => other,
        }
    }

    /// Ticks remaining, `None` when no countdown is running.
    #[must_use]
    pub const fn remaining(self) -> Option<u32> {
        match self {
            LockDelay::Idle => None,
            LockDelay::Counting(ticks) => Some(ticks),
            LockDelay::Expired => Some(0),
        }
    }
}

/// A piece instance: four absolute cells plus the pivot they rotate around.
///
/// The pivot starts at the kind's rotation origin and follows every
/// translation, so a rotation is always computed relative to the same point
/// of the piece no matter how far it has travelled.
///
/// Moves never validate themselves. Check [`Piece::can_move_down`],
/// [`Piece::can_move_side`] or [`Piece::can_rotate`] against the board first.
///
/// `Piece` is `Copy`: ghost and preview pieces are plain copies and never
/// alias the session's active piece.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind, Side};
///
/// let board = Board::new(20, 10, 2);
/// let mut piece = Piece::spawned(PieceKind::T, 4, 2);
/// if piece.can_move_side(&board, Side::Left) {
///     piece.move_side(Side::Left);
/// }
/// piece.hard_drop_to(&board);
/// assert!(!piece.can_move_down(&board));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    cells: [Coord; 4],
    pivot: Coord,
    lock_delay: LockDelay,
}

impl Piece {
    /// Creates a piece in its catalog orientation at the board origin.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        let shape = kind.shape();
        Self {
            kind,
            cells: shape.cells,
            pivot: shape.pivot,
            lock_delay: LockDelay::Idle,
        }
    }

    /// Creates a piece shifted `columns` right and `rows` down from the origin.
    #[must_use]
    pub fn spawned(kind: PieceKind, columns: i32, rows: i32) -> Self {
        let mut piece = Self::new(kind);
        piece.translate(columns, rows);
        piece
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn cells(&self) -> [Coord; 4] {
        self.cells
    }

    #[must_use]
    pub const fn pivot(&self) -> Coord {
        self.pivot
    }

    #[must_use]
    pub const fn lock_delay(&self) -> LockDelay {
        self.lock_delay
    }

    pub fn set_lock_delay(&mut self, lock_delay: LockDelay) {
        self.lock_delay = lock_delay;
    }

    /// Shifts every cell and the pivot by `(dx, dy)`.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.cells = self.translated_cells(dx, dy);
        self.pivot = self.pivot.offset(dx, dy);
    }

    pub fn move_down(&mut self) {
        self.translate(0, 1);
    }

    pub fn move_up(&mut self) {
        self.translate(0, -1);
    }

    pub fn move_side(&mut self, side: Side) {
        self.translate(side.dx(), 0);
    }

    #[must_use]
    pub fn can_move_down(&self, board: &Board) -> bool {
        board.can_place(&self.translated_cells(0, 1))
    }

    #[must_use]
    pub fn can_move_side(&self, board: &Board, side: Side) -> bool {
        board.can_place(&self.translated_cells(side.dx(), 0))
    }

    /// Rotates the piece 90 degrees around its pivot.
    ///
    /// Non-rotatable kinds are left unchanged.
    pub fn rotate(&mut self, rotation: Rotation) {
        if self.kind.is_rotatable() {
            self.cells = self.rotated_cells(rotation);
        }
    }

    /// Returns whether the kind rotates and the rotated cells are free.
    #[must_use]
    pub fn can_rotate(&self, board: &Board, rotation: Rotation) -> bool {
        self.kind.is_rotatable() && board.can_place(&self.rotated_cells(rotation))
    }

    /// Moves the piece straight down until it rests on the floor or stack.
    ///
    /// Returns the number of rows travelled.
    pub fn hard_drop_to(&mut self, board: &Board) -> usize {
        let mut rows = 0;
        while self.can_move_down(board) {
            self.move_down();
            rows += 1;
        }
        rows
    }

    fn translated_cells(&self, dx: i32, dy: i32) -> [Coord; 4] {
        self.cells.map(|p| p.offset(dx, dy))
    }

    fn rotated_cells(&self, rotation: Rotation) -> [Coord; 4] {
        let pivot = self.pivot;
        self.cells.map(|p| {
            let rel = rotation.apply(Coord::new(p.x - pivot.x, p.y - pivot.y));
            rel.offset(pivot.x, pivot.y)
        })
    }
}
