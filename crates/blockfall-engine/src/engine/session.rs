use rand::Rng as _;
use serde::Serialize;

use crate::{
    GameConfig, IntentError, PieceSeed,
    core::{LockDelay, Rotation, Side},
};

use super::{
    GameStats, Placement,
    game_field::GameField,
    gravity,
    preview::{SessionSnapshot, ghost_piece},
};

/// Ticks a grounded piece may rest before it locks.
pub const LOCK_DELAY_TICKS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// A discrete player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
    Restart,
}

/// A running game.
///
/// The session owns the field and all timing. It never reads the clock:
/// the driver calls [`GameSession::tick`] at a fixed period and passes
/// player input through [`GameSession::apply`] in between. Each call is
/// applied completely before it returns.
///
/// # Timing
///
/// A running lock delay counts down every tick regardless of the drop
/// countdown and locks the piece when it runs out, so a grounded piece locks
/// [`LOCK_DELAY_TICKS`] ticks after the delay starts. Otherwise each tick
/// decrements the automatic-drop countdown. When it goes below zero it is
/// reset to the level's drop rate and the piece tries to step down; a failed
/// step starts the lock delay.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    field: GameField,
    stats: GameStats,
    session_state: SessionState,
    ticks: u64,
    drop_rate: u32,
    drop_countdown: i64,
}

impl GameSession {
    /// Starts a session with a random piece seed.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Self {
        let stats = GameStats::new(config.starting_level());
        let drop_rate = gravity::drop_rate(stats.level());
        Self {
            config,
            field: GameField::with_seed(config, seed),
            stats,
            session_state: SessionState::Playing,
            ticks: 0,
            drop_rate,
            drop_countdown: drop_rate.into(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Ticks played since the session started or restarted.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks between automatic drops at the current level.
    #[must_use]
    pub fn drop_rate(&self) -> u32 {
        self.drop_rate
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Advances the simulation by one tick. Does nothing unless playing.
    pub fn tick(&mut self) {
        if !self.session_state.is_playing() {
            return;
        }
        self.ticks += 1;

        // A countdown started by this tick's failed step is first advanced on
        // the next tick, like one started by a blocked soft drop.
        let lock_delay = self.field.active_piece().lock_delay().advanced();
        self.field.set_lock_delay(lock_delay);
        if lock_delay.is_expired() {
            self.lock_piece(Placement::Gravity);
            return;
        }

        self.drop_countdown -= 1;
        if self.drop_countdown < 0 {
            self.drop_countdown = self.drop_rate.into();
            if self.field.try_move_down().is_ok() {
                self.field.set_lock_delay(LockDelay::Idle);
            } else {
                self.start_lock_delay();
            }
        }
    }

    /// Applies a player intent.
    ///
    /// `Err` means the intent was rejected and the session is unchanged,
    /// except that a blocked soft drop still starts the lock delay.
    pub fn apply(&mut self, intent: Intent) -> Result<(), IntentError> {
        match self.session_state {
            SessionState::Playing => {}
            SessionState::Paused => return Err(IntentError::Paused),
            SessionState::GameOver if intent == Intent::Restart => {
                self.restart();
                return Ok(());
            }
            SessionState::GameOver => return Err(IntentError::GameOver),
        }

        match intent {
            Intent::MoveLeft => self.move_side(Side::Left),
            Intent::MoveRight => self.move_side(Side::Right),
            Intent::SoftDrop => self.soft_drop(),
            Intent::HardDrop => {
                self.field.hard_drop();
                self.lock_piece(Placement::HardDrop);
                Ok(())
            }
            Intent::RotateCw => self.rotate(Rotation::Clockwise),
            Intent::RotateCcw => self.rotate(Rotation::CounterClockwise),
            Intent::Hold => {
                self.field.try_hold()?;
                self.reset_drop_countdown();
                Ok(())
            }
            Intent::Restart => Err(IntentError::NotGameOver),
        }
    }

    /// Builds a render snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let active = self.field.active_piece();
        SessionSnapshot {
            board: self.field.board().clone(),
            active: active.into(),
            ghost: ghost_piece(&active, self.field.board()).into(),
            held: self.field.held_piece(),
            can_hold: self.field.can_hold(),
            queue: self.field.next_pieces().collect(),
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.total_cleared_lines(),
            line_clears: *self.stats.line_cleared_counter(),
            completed_pieces: self.stats.completed_pieces(),
            ticks: self.ticks,
            state: self.session_state,
        }
    }

    fn move_side(&mut self, side: Side) -> Result<(), IntentError> {
        self.field.try_move_side(side)?;
        self.release_if_unsupported();
        Ok(())
    }

    fn rotate(&mut self, rotation: Rotation) -> Result<(), IntentError> {
        self.field.try_rotate(rotation)?;
        self.release_if_unsupported();
        Ok(())
    }

    fn soft_drop(&mut self) -> Result<(), IntentError> {
        if let Err(e) = self.field.try_move_down() {
            self.start_lock_delay();
            return Err(e);
        }
        self.field.set_lock_delay(LockDelay::Idle);
        self.reset_drop_countdown();
        Ok(())
    }

    /// Cancels the lock delay of a piece that was moved off its support.
    ///
    /// The next automatic drop comes after at most half the drop rate.
    fn release_if_unsupported(&mut self) {
        let piece = self.field.active_piece();
        if piece.lock_delay().is_idle() || !piece.can_move_down(self.field.board()) {
            return;
        }
        self.field.set_lock_delay(LockDelay::Idle);
        self.drop_countdown = self.drop_countdown.min((self.drop_rate / 2).into());
    }

    fn start_lock_delay(&mut self) {
        if self.field.active_piece().lock_delay().is_idle() {
            self.field.set_lock_delay(LockDelay::start(LOCK_DELAY_TICKS));
        }
    }

    fn reset_drop_countdown(&mut self) {
        self.drop_countdown = self.drop_rate.into();
    }

    fn lock_piece(&mut self, placement: Placement) {
        let cells = self.field.active_piece().cells().len();
        let (cleared_lines, result) = self.field.complete_piece_drop();
        self.stats.complete_piece_drop(placement, cells, cleared_lines);
        self.drop_rate = gravity::drop_rate(self.stats.level());
        self.reset_drop_countdown();
        if result.is_err() {
            self.session_state = SessionState::GameOver;
        }
    }

    fn restart(&mut self) {
        self.stats = GameStats::new(self.config.starting_level());
        self.ticks = 0;
        self.drop_rate = gravity::drop_rate(self.stats.level());
        self.reset_drop_countdown();
        self.session_state = match self.field.reset() {
            Ok(()) => SessionState::Playing,
            Err(_) => SessionState::GameOver,
        };
    }

    #[cfg(test)]
    pub(crate) fn field_mut(&mut self) -> &mut GameField {
        &mut self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, Piece, PieceKind};

    fn session(rows: usize, level: usize) -> GameSession {
        GameSession::with_seed(GameConfig::new(rows, level), PieceSeed::from_bytes([42; 16]))
    }

    /// Replaces the board of a default-sized session.
    ///
    /// `rows` lists the bottom rows of the board, top first.
    fn with_bottom_rows(session: &mut GameSession, rows: &[&str]) {
        let total = session.field().board().total_rows();
        let mut all = vec![".........."; total - rows.len()];
        all.extend_from_slice(rows);
        *session.field_mut().board_mut() = Board::from_rows(2, &all);
    }

    fn set_active(session: &mut GameSession, piece: Piece) {
        session.field_mut().set_active_piece(piece).unwrap();
    }

    fn spawned(kind: PieceKind) -> Piece {
        Piece::spawned(kind, 4, 2)
    }

    #[test]
    fn test_initial_state() {
        let session = session(20, 1);
        assert!(session.session_state().is_playing());
        assert_eq!(session.drop_rate(), 200);
        assert_eq!(session.stats().score(), 0);
        assert_eq!(session.stats().level(), 1);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.queue.len(), 3);
        assert!(snapshot.can_hold);
        assert_eq!(snapshot.held, None);
    }

    #[test]
    fn test_rows_21_clamps_to_22() {
        let session = session(21, 1);
        let board = session.field().board();
        assert_eq!(board.visible_rows(), 22);
        assert_eq!(board.columns(), 11);
        assert_eq!(board.total_rows(), 24);
    }

    #[test]
    fn test_gravity_steps_after_drop_rate() {
        let mut session = session(20, 1);
        let start = session.field().active_piece();
        for _ in 0..200 {
            session.tick();
        }
        assert_eq!(session.field().active_piece().cells(), start.cells());
        session.tick();
        let mut expected = start;
        expected.move_down();
        assert_eq!(session.field().active_piece().cells(), expected.cells());
        assert_eq!(session.ticks(), 201);
    }

    #[test]
    fn test_single_clear_at_level_one() {
        let mut session = session(20, 1);
        with_bottom_rows(&mut session, &["IIII....II"]);
        set_active(&mut session, spawned(PieceKind::I));
        session.apply(Intent::HardDrop).unwrap();
        assert_eq!(session.stats().total_cleared_lines(), 1);
        assert_eq!(session.stats().score(), 4 * 2 + 100);
    }

    #[test]
    fn test_four_lines_at_level_three() {
        let mut session = session(20, 3);
        with_bottom_rows(
            &mut session,
            &["ZZZZZ.ZZZZ", "SSSSS.SSSS", "TTTTT.TTTT", "LLLLL.LLLL"],
        );
        let mut piece = spawned(PieceKind::I);
        piece.rotate(Rotation::Clockwise);
        assert!(piece.cells().iter().all(|p| p.x == 5));
        set_active(&mut session, piece);
        session.apply(Intent::HardDrop).unwrap();
        assert_eq!(session.stats().total_cleared_lines(), 4);
        assert_eq!(session.stats().score(), 4 * 2 + 2400);
        assert!(session.field().board().rows().flatten().all(|b| b.is_empty()));
    }

    #[test]
    fn test_level_up_speeds_gravity() {
        let mut session = session(20, 1);
        for _ in 0..10 {
            with_bottom_rows(&mut session, &["JJJJ....JJ"]);
            set_active(&mut session, spawned(PieceKind::I));
            session.apply(Intent::HardDrop).unwrap();
        }
        assert_eq!(session.stats().level(), 2);
        assert_eq!(session.drop_rate(), gravity::drop_rate(2));
    }

    #[test]
    fn test_lock_delay_forces_lock() {
        let mut session = session(20, 1);
        while session.apply(Intent::SoftDrop).is_ok() {}
        assert_eq!(
            session.field().active_piece().lock_delay(),
            LockDelay::Counting(LOCK_DELAY_TICKS)
        );
        for _ in 0..LOCK_DELAY_TICKS - 1 {
            session.tick();
        }
        assert_eq!(session.stats().completed_pieces(), 0);
        session.tick();
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.stats().score(), 4);
    }

    #[test]
    fn test_gravity_alone_grounds_and_locks_piece() {
        let mut session = session(20, 1);
        let start = loop {
            session.tick();
            if session.field().active_piece().lock_delay().is_counting() {
                break session.ticks();
            }
            assert!(session.ticks() < 10_000, "piece never grounded");
        };
        // The delay starts on the tick whose automatic step is blocked.
        let snapshot = session.snapshot();
        assert_eq!(snapshot.active.cells, snapshot.ghost.cells);
        assert_eq!(start % u64::from(session.drop_rate() + 1), 0);
        assert_eq!(
            session.field().active_piece().lock_delay(),
            LockDelay::Counting(LOCK_DELAY_TICKS)
        );

        for _ in 0..LOCK_DELAY_TICKS - 1 {
            session.tick();
        }
        assert_eq!(session.stats().completed_pieces(), 0);
        session.tick();
        assert_eq!(session.ticks(), start + u64::from(LOCK_DELAY_TICKS));
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.stats().score(), 4);
        assert!(session.field().active_piece().lock_delay().is_idle());
    }

    #[test]
    fn test_blocked_soft_drop_does_not_restart_lock_delay() {
        let mut session = session(20, 1);
        while session.apply(Intent::SoftDrop).is_ok() {}
        for _ in 0..10 {
            session.tick();
        }
        assert_eq!(session.apply(Intent::SoftDrop), Err(IntentError::Blocked));
        assert_eq!(
            session.field().active_piece().lock_delay(),
            LockDelay::Counting(LOCK_DELAY_TICKS - 10)
        );
    }

    #[test]
    fn test_grounded_side_move_keeps_lock_delay() {
        let mut session = session(20, 1);
        set_active(&mut session, spawned(PieceKind::O));
        while session.apply(Intent::SoftDrop).is_ok() {}
        session.tick();
        let lock_delay = session.field().active_piece().lock_delay();
        assert!(lock_delay.is_counting());
        session.apply(Intent::MoveRight).unwrap();
        assert_eq!(session.field().active_piece().lock_delay(), lock_delay);
    }

    #[test]
    fn test_sliding_off_ledge_cancels_lock_delay() {
        let mut session = session(20, 1);
        with_bottom_rows(&mut session, &["I........."]);
        set_active(&mut session, Piece::spawned(PieceKind::O, 0, 2));
        while session.apply(Intent::SoftDrop).is_ok() {}
        assert!(session.field().active_piece().lock_delay().is_counting());
        session.apply(Intent::MoveRight).unwrap();
        assert!(session.field().active_piece().lock_delay().is_idle());
        // Next automatic step comes after at most half the drop rate.
        let before = session.field().active_piece();
        for _ in 0..=100 {
            session.tick();
        }
        assert_ne!(session.field().active_piece().cells(), before.cells());
    }

    #[test]
    fn test_hold_once_per_lock() {
        let mut session = session(20, 1);
        session.apply(Intent::Hold).unwrap();
        assert!(!session.field().can_hold());
        let before = session.snapshot();
        assert_eq!(
            session.apply(Intent::Hold),
            Err(IntentError::HoldUnavailable)
        );
        assert_eq!(session.snapshot(), before);
        session.apply(Intent::HardDrop).unwrap();
        assert!(session.field().can_hold());
        assert!(session.apply(Intent::Hold).is_ok());
    }

    #[test]
    fn test_blocked_hold_is_rejected() {
        let mut session = session(20, 1);
        let mut rows = vec!["....##...."; 4];
        rows.extend(std::iter::repeat_n("..........", 18));
        set_active(&mut session, Piece::spawned(PieceKind::O, 0, 12));
        *session.field_mut().board_mut() = Board::from_rows(2, &rows);
        assert_eq!(session.apply(Intent::Hold), Err(IntentError::Blocked));
        assert!(session.field().can_hold());
        assert!(session.session_state().is_playing());
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let mut session = session(20, 1);
        let mut rows = vec!["....##...."; 4];
        rows.extend(std::iter::repeat_n("..........", 18));
        *session.field_mut().board_mut() = Board::from_rows(2, &rows);
        set_active(&mut session, Piece::spawned(PieceKind::O, 0, 12));
        session.apply(Intent::HardDrop).unwrap();
        assert!(session.session_state().is_game_over());
        assert!(session.snapshot().is_game_over());

        let before = session.snapshot();
        for intent in [
            Intent::MoveLeft,
            Intent::MoveRight,
            Intent::SoftDrop,
            Intent::HardDrop,
            Intent::RotateCw,
            Intent::RotateCcw,
            Intent::Hold,
        ] {
            assert_eq!(session.apply(intent), Err(IntentError::GameOver));
        }
        session.tick();
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut session = session(20, 4);
        with_bottom_rows(&mut session, &["IIII....II"]);
        set_active(&mut session, spawned(PieceKind::I));
        session.apply(Intent::HardDrop).unwrap();
        assert!(session.stats().score() > 0);

        let mut rows = vec!["....##...."; 4];
        rows.extend(std::iter::repeat_n("..........", 18));
        *session.field_mut().board_mut() = Board::from_rows(2, &rows);
        set_active(&mut session, Piece::spawned(PieceKind::O, 0, 12));
        session.apply(Intent::HardDrop).unwrap();
        assert!(session.session_state().is_game_over());

        session.apply(Intent::Restart).unwrap();
        assert!(session.session_state().is_playing());
        assert_eq!(session.stats().score(), 0);
        assert_eq!(session.stats().total_cleared_lines(), 0);
        assert_eq!(session.stats().level(), 4);
        assert_eq!(session.ticks(), 0);
        assert!(session.field().board().rows().flatten().all(|b| b.is_empty()));
        assert_eq!(session.field().held_piece(), None);
        assert!(session.field().can_hold());
    }

    #[test]
    fn test_restart_while_playing_is_rejected() {
        let mut session = session(20, 1);
        assert_eq!(session.apply(Intent::Restart), Err(IntentError::NotGameOver));
    }

    #[test]
    fn test_pause_stops_ticks_and_intents() {
        let mut session = session(20, 1);
        session.toggle_pause();
        let before = session.snapshot();
        session.tick();
        assert_eq!(session.apply(Intent::MoveLeft), Err(IntentError::Paused));
        assert_eq!(session.snapshot(), before);
        session.toggle_pause();
        session.tick();
        assert_eq!(session.ticks(), 1);
    }

    #[test]
    fn test_snapshot_ghost_rests_on_floor() {
        let session = session(20, 1);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.active.kind, snapshot.ghost.kind);
        let bottom = snapshot.ghost.cells.iter().map(|p| p.y).max().unwrap();
        assert_eq!(bottom, 21);
    }

    #[test]
    fn test_snapshot_serializes() {
        let session = session(20, 1);
        let value = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(value["state"], "playing");
        assert_eq!(value["board"].as_array().unwrap().len(), 22);
        assert_eq!(value["board"][21], "..........");
        assert_eq!(value["queue"].as_array().unwrap().len(), 3);
    }
}
