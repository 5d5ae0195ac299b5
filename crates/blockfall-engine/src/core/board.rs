use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeSeq as _};

use super::{piece::Coord, piece_kind::PieceKind};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Locked cell of a specific piece type.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Character used by the text form of the board.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Block::Empty => '.',
            Block::Piece(kind) => kind.as_char(),
        }
    }
}

/// The fixed-size playfield.
///
/// The matrix is `hidden_rows + visible_rows` tall and `columns` wide. Row 0
/// is the top hidden row; the visible area starts at row `hidden_rows`. The
/// hidden rows give a newly spawned piece room to escape upward before the
/// game is lost.
///
/// Dimensions never change after construction; only cell contents do.
/// Every coordinate is bounds-checked before it is read or written, and
/// out-of-bounds cells read as occupied so that walls, floor and ceiling
/// behave like locked blocks for collision purposes.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Coord, PieceKind};
///
/// let mut board = Board::new(20, 10, 2);
/// let bottom = board.total_rows() as i32 - 1;
/// let row: Vec<Coord> = (0..10).map(|x| Coord::new(x, bottom)).collect();
/// board.commit(&row, PieceKind::I);
///
/// let full = board.detect_full_rows();
/// assert_eq!(full, vec![board.total_rows() - 1]);
/// board.clear_rows(&full);
/// assert!(board.detect_full_rows().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    visible_rows: usize,
    hidden_rows: usize,
    columns: usize,
    cells: Vec<Block>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if `visible_rows` or `columns` is zero.
    #[must_use]
    pub fn new(visible_rows: usize, columns: usize, hidden_rows: usize) -> Self {
        assert!(visible_rows > 0 && columns > 0, "board must not be empty");
        Self {
            visible_rows,
            hidden_rows,
            columns,
            cells: vec![Block::Empty; (visible_rows + hidden_rows) * columns],
        }
    }

    /// Builds a board from its text form, one string per row, top row first.
    ///
    /// `.` is an empty cell, a piece character is a locked cell. Any other
    /// character is treated as a locked `I` cell, which keeps fixtures
    /// readable with `#`.
    ///
    /// # Panics
    ///
    /// Panics if rows have different lengths or there are fewer rows than
    /// `hidden_rows + 1`.
    #[must_use]
    pub fn from_rows(hidden_rows: usize, rows: &[&str]) -> Self {
        assert!(rows.len() > hidden_rows, "board needs at least one visible row");
        let columns = rows[0].chars().count();
        let mut board = Self::new(rows.len() - hidden_rows, columns, hidden_rows);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.chars().count(), columns, "row {y} has the wrong width");
            for (x, ch) in row.chars().enumerate() {
                board.cells[y * columns + x] = match ch {
                    '.' => Block::Empty,
                    ch => Block::Piece(PieceKind::from_char(ch).unwrap_or(PieceKind::I)),
                };
            }
        }
        board
    }

    #[must_use]
    pub const fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    #[must_use]
    pub const fn hidden_rows(&self) -> usize {
        self.hidden_rows
    }

    #[must_use]
    pub const fn total_rows(&self) -> usize {
        self.visible_rows + self.hidden_rows
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    fn index(&self, p: Coord) -> Option<usize> {
        let x = usize::try_from(p.x).ok()?;
        let y = usize::try_from(p.y).ok()?;
        (x < self.columns && y < self.total_rows()).then(|| y * self.columns + x)
    }

    /// Returns the cell at `p`, or `None` outside the board.
    #[must_use]
    pub fn get(&self, p: Coord) -> Option<Block> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Returns whether `p` is blocked. Out-of-bounds cells count as occupied.
    #[must_use]
    pub fn is_occupied_at(&self, p: Coord) -> bool {
        self.get(p).is_none_or(|block| !block.is_empty())
    }

    /// Returns whether every cell is in bounds and empty.
    #[must_use]
    pub fn can_place(&self, cells: &[Coord]) -> bool {
        cells.iter().all(|p| !self.is_occupied_at(*p))
    }

    /// Writes `kind` into every cell.
    ///
    /// Callers validate with [`Board::can_place`] first. Out-of-bounds cells
    /// are skipped.
    pub fn commit(&mut self, cells: &[Coord], kind: PieceKind) {
        debug_assert!(self.can_place(cells), "committing onto occupied cells");
        for p in cells {
            if let Some(i) = self.index(*p) {
                self.cells[i] = Block::Piece(kind);
            }
        }
    }

    /// Iterates over all rows, hidden rows first.
    pub fn rows(&self) -> impl Iterator<Item = &[Block]> {
        self.cells.chunks_exact(self.columns)
    }

    /// Iterates over the visible rows only.
    pub fn visible(&self) -> impl Iterator<Item = &[Block]> {
        self.rows().skip(self.hidden_rows)
    }

    /// Returns the indices of all completely filled rows, lowest index first.
    ///
    /// Hidden rows are scanned too.
    #[must_use]
    pub fn detect_full_rows(&self) -> Vec<usize> {
        self.rows()
            .enumerate()
            .filter(|(_, row)| row.iter().all(|b| !b.is_empty()))
            .map(|(y, _)| y)
            .collect()
    }

    /// Removes the given rows, shifting everything above each one down by one.
    ///
    /// `rows` must be in ascending order, as returned by
    /// [`Board::detect_full_rows`]. Shifting only touches rows above the one
    /// being cleared, so the remaining indices stay valid. Indices outside the
    /// board are ignored.
    pub fn clear_rows(&mut self, rows: &[usize]) {
        let width = self.columns;
        for &y in rows {
            if y >= self.total_rows() {
                continue;
            }
            self.cells.copy_within(0..y * width, width);
            self.cells[..width].fill(Block::Empty);
        }
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Block::Empty);
    }

    fn row_string(row: &[Block]) -> String {
        row.iter().map(|b| b.as_char()).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", Self::row_string(row))?;
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // One string per row, e.g. "..IIII....".
        let mut seq = serializer.serialize_seq(Some(self.total_rows()))?;
        for row in self.rows() {
            seq.serialize_element(&Self::row_string(row))?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row(board: &Board, y: usize) -> Vec<Coord> {
        let y = i32::try_from(y).unwrap();
        (0..board.columns())
            .map(|x| Coord::new(i32::try_from(x).unwrap(), y))
            .collect()
    }

    #[test]
    fn test_initial_board_is_empty() {
        let board = Board::new(20, 10, 2);
        assert_eq!(board.total_rows(), 22);
        assert_eq!(board.rows().count(), 22);
        assert_eq!(board.visible().count(), 20);
        assert!(board.rows().flatten().all(|b| b.is_empty()));
    }

    #[test]
    fn test_out_of_bounds_is_occupied() {
        let board = Board::new(20, 10, 2);
        assert!(board.is_occupied_at(Coord::new(-1, 0)));
        assert!(board.is_occupied_at(Coord::new(10, 0)));
        assert!(board.is_occupied_at(Coord::new(0, -1)));
        assert!(board.is_occupied_at(Coord::new(0, 22)));
        assert!(!board.is_occupied_at(Coord::new(9, 21)));
        assert_eq!(board.get(Coord::new(0, 22)), None);
    }

    #[test]
    fn test_can_place() {
        let mut board = Board::new(20, 10, 2);
        let cells = [Coord::new(0, 0), Coord::new(1, 0)];
        assert!(board.can_place(&cells));
        board.commit(&[Coord::new(1, 0)], PieceKind::T);
        assert!(!board.can_place(&cells));
        assert!(!board.can_place(&[Coord::new(-1, 5)]));
        assert_eq!(board.get(Coord::new(1, 0)), Some(Block::Piece(PieceKind::T)));
    }

    #[test]
    fn test_detect_full_rows_ascending_including_hidden() {
        let mut board = Board::new(10, 5, 2);
        for y in [11, 0, 6] {
            board.commit(&full_row(&board, y), PieceKind::L);
        }
        assert_eq!(board.detect_full_rows(), vec![0, 6, 11]);
    }

    #[test]
    fn test_partial_row_is_not_full() {
        let board = Board::from_rows(0, &["....", "###.", "####"]);
        assert_eq!(board.detect_full_rows(), vec![2]);
    }

    #[test]
    fn test_clear_rows_shifts_rows_above() {
        let mut board = Board::from_rows(
            1,
            &[
                "....", //
                "Z...", //
                "JJJJ", //
                ".T..", //
                "IIII", //
                "..O.", //
            ],
        );
        let full = board.detect_full_rows();
        assert_eq!(full, vec![2, 4]);
        board.clear_rows(&full);
        assert_eq!(
            board.to_string(),
            "....\n....\n....\nZ...\n.T..\n..O.\n"
        );
        assert!(board.detect_full_rows().is_empty());
    }

    #[test]
    fn test_clear_top_row() {
        let mut board = Board::from_rows(0, &["SSS", "..S"]);
        board.clear_rows(&[0]);
        assert_eq!(board.to_string(), "...\n..S\n");
    }

    #[test]
    fn test_clear_no_rows_is_noop() {
        let mut board = Board::from_rows(0, &["T..", "TT."]);
        let before = board.clone();
        board.clear_rows(&[]);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_all_rows() {
        let mut board = Board::new(4, 3, 0);
        for y in 0..4 {
            board.commit(&full_row(&board, y), PieceKind::I);
        }
        let full = board.detect_full_rows();
        assert_eq!(full.len(), 4);
        board.clear_rows(&full);
        assert!(board.rows().flatten().all(|b| b.is_empty()));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut board = Board::from_rows(1, &["I..", "OOT"]);
        board.clear();
        assert_eq!(board, Board::new(1, 3, 1));
    }

    #[test]
    fn test_serialize_as_row_strings() {
        let board = Board::from_rows(1, &["...", "L.Z"]);
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"["...","L.Z"]"#);
    }
}
