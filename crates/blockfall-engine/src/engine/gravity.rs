//! Level-indexed fall speed.
//!
//! Each level maps to an acceleration value; the number of ticks between
//! automatic downward steps is `round(BASE_TICK_UNIT / acceleration)`, never
//! below one. Levels past the end of the table reuse the fastest entry.

/// Acceleration per level, starting at level 1.
pub const GRAVITY_TABLE: [f64; 15] = [
    0.016_67, 0.021_017, 0.026_977, 0.035_256, 0.046_93, 0.063_61, 0.0879, 0.1236, 0.1775,
    0.2598, 0.388, 0.59, 0.92, 1.46, 2.36,
];

/// Ticks per unit of acceleration.
pub const BASE_TICK_UNIT: f64 = 3.33;

/// Returns the acceleration used at `level`.
///
/// Level 0 is treated as level 1.
#[must_use]
pub fn acceleration(level: usize) -> f64 {
    let index = level.saturating_sub(1).min(GRAVITY_TABLE.len() - 1);
    GRAVITY_TABLE[index]
}

/// Returns the number of ticks between automatic drops at `level`.
///
/// ```
/// use blockfall_engine::engine::gravity;
///
/// assert_eq!(gravity::drop_rate(1), 200);
/// assert_eq!(gravity::drop_rate(15), 1);
/// assert_eq!(gravity::drop_rate(99), 1);
/// ```
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn drop_rate(level: usize) -> u32 {
    let ticks = (BASE_TICK_UNIT / acceleration(level)).round();
    (ticks as u32).max(1)
}
