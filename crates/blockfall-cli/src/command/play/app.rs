use std::time::Duration;

use blockfall_engine::{GameSession, SessionState};
use blockfall_runtime::{App, RenderMode, Runtime};
use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    command::play::input::{Action, action_for_key},
    ui::widgets::{CellSize, KeyBinding, KeyBindingDisplay, SessionDisplay},
};

/// Simulation step; 200 ticks make one second.
const TICK_PERIOD: Duration = Duration::from_millis(5);
const FPS: f64 = 60.0;

const PLAYING_KEYS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft Drop"),
    (&["Space"], "Hard Drop"),
    (&["↑", "X", "Z"], "Rotate"),
    (&["C"], "Hold"),
    (&["P"], "Pause"),
    (&["Q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding] = &[(&["P"], "Resume"), (&["Q"], "Quit")];
const GAME_OVER_KEYS: &[KeyBinding] = &[(&["R"], "Restart"), (&["Q"], "Quit")];

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    cell_size: CellSize,
    show_ghost: bool,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession, cell_size: CellSize, show_ghost: bool) -> Self {
        Self {
            session,
            cell_size,
            show_ghost,
            is_exiting: false,
        }
    }

    /// Play time derived from the tick counter, so pauses do not count.
    fn elapsed(&self) -> Duration {
        TICK_PERIOD.saturating_mul(u32::try_from(self.session.ticks()).unwrap_or(u32::MAX))
    }

    fn perform(&mut self, action: Action) {
        match action {
            // A rejected intent leaves the session unchanged; nothing to report.
            Action::Intent(intent) => _ = self.session.apply(intent),
            Action::TogglePause => self.session.toggle_pause(),
            Action::Quit => self.is_exiting = true,
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_period(Some(TICK_PERIOD));
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        if let Some(action) = event.as_key_event().and_then(action_for_key) {
            self.perform(action);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.session.snapshot();
        let session_display = SessionDisplay::new(&snapshot, self.elapsed(), self.cell_size)
            .show_ghost(self.show_ghost);
        let bindings = match snapshot.state {
            SessionState::Playing => PLAYING_KEYS,
            SessionState::Paused => PAUSED_KEYS,
            SessionState::GameOver => GAME_OVER_KEYS,
        };

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(&session_display, main_area);
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        self.session.tick();
    }
}
