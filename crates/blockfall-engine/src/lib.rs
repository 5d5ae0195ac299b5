//! Falling-block puzzle simulation engine.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - the piece catalog, pieces and the board. Pure data plus
//!   collision and transform rules.
//! - [`engine`] - the session state machine driving those pieces: queue and
//!   hold, gravity and lock delay, scoring and leveling, snapshots.
//!
//! [`GameConfig`] holds the clamped initialization parameters a session is
//! created from. Nothing in this crate performs I/O or reads the clock; the
//! driver calls [`GameSession::tick`] at a fixed cadence and feeds
//! [`Intent`]s in between.

pub use self::{config::*, core::*, engine::*};

pub mod config;
pub mod core;
pub mod engine;

/// Reason an intent was ignored.
///
/// A rejected intent leaves the session exactly as it was, except that a
/// blocked soft drop still starts the lock delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum IntentError {
    #[display("piece is blocked")]
    Blocked,
    #[display("hold already used for this piece")]
    HoldUnavailable,
    #[display("game is over")]
    GameOver,
    #[display("game is still running")]
    NotGameOver,
    #[display("game is paused")]
    Paused,
}

/// The next piece could not be placed anywhere in the spawn area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding at spawn position")]
pub struct SpawnCollisionError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece seed {input:?}: expected 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}

impl ParseSeedError {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
        }
    }
}
