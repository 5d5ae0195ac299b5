//! Session initialization parameters.

/// Rows above the visible area that absorb spawn overlap.
pub const HIDDEN_ROWS: usize = 2;

pub const DEFAULT_ROWS: usize = 20;
pub const MIN_ROWS: usize = 10;
pub const MAX_ROWS: usize = 400;

pub const DEFAULT_LEVEL: usize = 1;
pub const MIN_LEVEL: usize = 1;

/// Board size and starting level of a session.
///
/// Values are clamped on construction, so a `GameConfig` always describes a
/// valid board: an even number of visible rows within
/// [`MIN_ROWS`]..=[`MAX_ROWS`], and half as many columns.
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config = GameConfig::new(21, 0);
/// assert_eq!(config.rows(), 22);
/// assert_eq!(config.columns(), 11);
/// assert_eq!(config.starting_level(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    rows: usize,
    starting_level: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_LEVEL)
    }
}

impl GameConfig {
    /// Odd row counts round up to the next even number before clamping.
    #[must_use]
    pub fn new(rows: usize, starting_level: usize) -> Self {
        let rows = rows.saturating_add(rows % 2).clamp(MIN_ROWS, MAX_ROWS);
        Self {
            rows,
            starting_level: starting_level.max(MIN_LEVEL),
        }
    }

    /// Visible rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.rows / 2
    }

    #[must_use]
    pub const fn hidden_rows(&self) -> usize {
        HIDDEN_ROWS
    }

    #[must_use]
    pub const fn starting_level(&self) -> usize {
        self.starting_level
    }
}
