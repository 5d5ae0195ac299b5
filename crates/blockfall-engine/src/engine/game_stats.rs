/// Score values for line clears, multiplied by the level before the clear.
///
/// Index corresponds to number of lines cleared simultaneously. Five or more
/// lines (only possible on very tall boards with hidden-row clears) score as
/// four.
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: usize = 10;

/// How a piece came to rest, which decides its placement points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Locked by gravity or after a soft drop: 1 point per cell.
    Gravity,
    /// Locked by a hard drop: 2 points per cell.
    HardDrop,
}

impl Placement {
    #[must_use]
    pub const fn points_per_cell(self) -> usize {
        match self {
            Placement::Gravity => 1,
            Placement::HardDrop => 2,
        }
    }
}

/// Game statistics tracking score, lines cleared, level and piece count.
///
/// - **Score**: placement points plus line-clear points, never decreasing
/// - **Level**: `lines / 10 + starting_level`
/// - **Completed pieces**: total number of pieces locked
/// - **Line clear distribution**: count of locks by lines cleared (0 to 4)
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameStats, Placement};
///
/// let mut stats = GameStats::new(3);
/// stats.complete_piece_drop(Placement::Gravity, 4, 4);
///
/// assert_eq!(stats.score(), 4 + 800 * 3);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    starting_level: usize,
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new(1)
    }
}

impl GameStats {
    /// Creates a tracker with all counters at zero.
    #[must_use]
    pub const fn new(starting_level: usize) -> Self {
        Self {
            starting_level,
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn starting_level(&self) -> usize {
        self.starting_level
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the current level.
    ///
    /// Level increases by 1 for every 10 lines cleared (integer division).
    #[must_use]
    pub const fn level(&self) -> usize {
        self.total_cleared_lines / LINES_PER_LEVEL + self.starting_level
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by lines cleared.
    ///
    /// Array indices represent:
    /// - `[0]`: locks that cleared nothing
    /// - `[1]` to `[3]`: singles, doubles, triples
    /// - `[4]`: four or more lines at once
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Points a clear of `cleared_lines` is worth at the current level.
    #[must_use]
    pub const fn line_clear_points(&self, cleared_lines: usize) -> usize {
        let index = if cleared_lines < SCORE_TABLE.len() {
            cleared_lines
        } else {
            SCORE_TABLE.len() - 1
        };
        SCORE_TABLE[index] * self.level()
    }

    /// Updates statistics after a piece lock.
    ///
    /// Line-clear points use the level in effect before the cleared lines are
    /// counted. Returns the points awarded.
    pub const fn complete_piece_drop(
        &mut self,
        placement: Placement,
        cells: usize,
        cleared_lines: usize,
    ) -> usize {
        let points = cells * placement.points_per_cell() + self.line_clear_points(cleared_lines);
        self.score += points;
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        let bucket = if cleared_lines < self.line_cleared_counter.len() {
            cleared_lines
        } else {
            self.line_cleared_counter.len() - 1
        };
        self.line_cleared_counter[bucket] += 1;
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_at_level_one_scores_100() {
        let stats = GameStats::new(1);
        assert_eq!(stats.line_clear_points(1), 100);
    }

    #[test]
    fn test_four_line_clear_at_level_three_scores_2400() {
        let mut stats = GameStats::new(3);
        let points = stats.complete_piece_drop(Placement::Gravity, 0, 4);
        assert_eq!(points, 2400);
        assert_eq!(stats.score(), 2400);
    }

    #[test]
    fn test_five_lines_score_as_four() {
        let mut stats = GameStats::new(1);
        assert_eq!(stats.line_clear_points(5), 800);
        stats.complete_piece_drop(Placement::Gravity, 4, 6);
        assert_eq!(stats.line_cleared_counter()[4], 1);
        assert_eq!(stats.total_cleared_lines(), 6);
    }

    #[test]
    fn test_placement_points() {
        let mut stats = GameStats::new(1);
        assert_eq!(stats.complete_piece_drop(Placement::Gravity, 4, 0), 4);
        assert_eq!(stats.complete_piece_drop(Placement::HardDrop, 4, 0), 8);
        assert_eq!(stats.score(), 12);
        assert_eq!(stats.completed_pieces(), 2);
        assert_eq!(stats.line_cleared_counter()[0], 2);
    }

    #[test]
    fn test_level_progression() {
        let mut stats = GameStats::new(1);
        for _ in 0..10 {
            stats.complete_piece_drop(Placement::Gravity, 4, 1);
        }
        assert_eq!(stats.level(), 2);
        for _ in 0..15 {
            stats.complete_piece_drop(Placement::Gravity, 4, 1);
        }
        assert_eq!(stats.total_cleared_lines(), 25);
        assert_eq!(stats.level(), 3);
    }

    #[test]
    fn test_clear_uses_level_before_clear() {
        let mut stats = GameStats::new(1);
        for _ in 0..9 {
            stats.complete_piece_drop(Placement::Gravity, 0, 1);
        }
        let points = stats.complete_piece_drop(Placement::Gravity, 0, 2);
        assert_eq!(points, 300);
        assert_eq!(stats.level(), 2);
    }
}
