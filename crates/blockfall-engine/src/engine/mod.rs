//! Session logic driving the core types.
//!
//! - [`GameField`] - board, active piece, queue and hold slot
//! - [`GameSession`] - tick-driven state machine: gravity, lock delay,
//!   scoring, leveling, game over and restart
//! - [`GameStats`] - score, lines, level and line-clear histogram
//! - [`PieceBuffer`] - uniform random queue plus hold slot
//! - [`PieceSeed`] - seed for deterministic piece generation
//! - [`SessionSnapshot`] - read-only view handed to renderers
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] from a [`GameConfig`](crate::GameConfig)
//! 2. Call [`GameSession::tick`] at a fixed cadence
//! 3. Feed player [`Intent`]s through [`GameSession::apply`] between ticks
//! 4. Render from [`GameSession::snapshot`]
//! 5. After game over, [`Intent::Restart`] starts a new game
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{GameConfig, GameSession, Intent, PieceSeed};
//!
//! let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
//! let mut session = GameSession::with_seed(GameConfig::default(), seed);
//!
//! session.apply(Intent::MoveLeft).ok();
//! session.apply(Intent::RotateCw).ok();
//! session.apply(Intent::HardDrop).unwrap();
//! for _ in 0..100 {
//!     session.tick();
//! }
//!
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.completed_pieces, 1);
//! assert_eq!(snapshot.queue.len(), 3);
//! ```

pub use self::{game_field::*, game_stats::*, piece_buffer::*, preview::*, session::*};

mod game_field;
mod game_stats;
pub mod gravity;
mod piece_buffer;
mod preview;
mod session;
