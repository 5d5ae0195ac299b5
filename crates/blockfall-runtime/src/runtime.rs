use std::{io, time::Duration};

use crate::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
    timestep::FixedTimestep,
};

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the `App` trait.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    /// Most ticks delivered for a single stretch of elapsed time.
    pub const MAX_CATCH_UP_TICKS: u32 = 40;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fixed tick period, restarting the timestep from now.
    ///
    /// Pass `None` to stop ticking.
    pub fn set_tick_period(&mut self, period: Option<Duration>) {
        self.events.set_timestep(
            period.map(|period| FixedTimestep::new(period, Self::MAX_CATCH_UP_TICKS)),
        );
    }

    /// Sets the render mode.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - `Event::Tick`: calls `app.update()`, once per elapsed tick period
    ///    - `Event::Render`: calls `app.draw()`
    ///    - `Event::Crossterm`: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => {
                        app.update(&mut self);
                    }
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => {
                        app.handle_event(&mut self, event);
                    }
                }
            }
            Ok(())
        })
    }
}
