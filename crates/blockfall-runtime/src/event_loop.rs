use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::{event::TuiEvent, timestep::FixedTimestep};

/// Rendering trigger mode.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Render after state changes (tick or crossterm event).
    #[default]
    OnDirty,
    /// Render after state changes, but with minimum interval between renders.
    ///
    /// If events occur faster than the interval, they are batched into one render.
    Throttled(Duration),
}

impl RenderMode {
    /// Creates `Throttled` mode from frame rate (FPS).
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Event loop state management.
///
/// Returns the next event via `next()`. Ticks come from a [`FixedTimestep`]:
/// every due tick is delivered as its own `Tick` event before anything else.
/// Without a timestep no ticks are generated.
#[derive(Debug)]
pub(super) struct EventLoop {
    timestep: Option<FixedTimestep>,
    pending_ticks: u32,
    render_mode: RenderMode,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates a new `EventLoop`.
    ///
    /// Ticks are disabled, and render mode defaults to `OnDirty`.
    pub fn new() -> Self {
        let now = Instant::now();
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            timestep: None,
            pending_ticks: 0,
            render_mode: RenderMode::default(),
            last_render: past_time,
            dirty: true, // Initial render is required on startup
        }
    }

    /// Replaces the tick source; pending ticks of the old one are dropped.
    ///
    /// Pass `None` to disable tick events.
    pub(super) fn set_timestep(&mut self, timestep: Option<FixedTimestep>) {
        self.timestep = timestep;
        self.pending_ticks = 0;
    }

    /// Sets the render mode.
    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick/render time is reached or a crossterm event occurs.
    /// If both tick and render are unset, only waits for crossterm events.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if self.pending_ticks == 0
                && let Some(timestep) = &mut self.timestep
            {
                self.pending_ticks = timestep.advance_to(now);
            }
            if self.pending_ticks > 0 {
                self.pending_ticks -= 1;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            let do_render = match self.render_mode {
                RenderMode::OnDirty => self.dirty,
                RenderMode::Throttled(interval) => {
                    self.dirty && now.duration_since(self.last_render) >= interval
                }
            };
            if do_render {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.timestep.as_ref().map(FixedTimestep::next_deadline);
        let next_render_at = match self.render_mode {
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
        };
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}
