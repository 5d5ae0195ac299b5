use std::time::{Duration, Instant};

/// Converts elapsed wall-clock time into a whole number of fixed ticks.
///
/// Time is accumulated and every full `period` in the accumulator becomes
/// one tick; the remainder carries over to the next call. After a long
/// stall at most `max_steps` ticks are produced and the rest of the backlog
/// is dropped, so the simulation slows down instead of freezing to catch up.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_runtime::FixedTimestep;
///
/// let mut timestep = FixedTimestep::new(Duration::from_millis(5), 10);
/// assert_eq!(timestep.advance(Duration::from_millis(12)), 2);
/// assert_eq!(timestep.advance(Duration::from_millis(3)), 1);
/// assert_eq!(timestep.advance(Duration::from_secs(1)), 10);
/// ```
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    period: Duration,
    max_steps: u32,
    accumulated: Duration,
    last: Instant,
}

impl FixedTimestep {
    /// Creates a timestep starting now.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    #[must_use]
    pub fn new(period: Duration, max_steps: u32) -> Self {
        assert!(!period.is_zero(), "tick period must not be zero");
        Self {
            period,
            max_steps,
            accumulated: Duration::ZERO,
            last: Instant::now(),
        }
    }

    /// Adds `elapsed` and returns how many ticks are now due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;
        let period = self.period.as_nanos();
        let due = self.accumulated.as_nanos() / period;
        match u32::try_from(due) {
            Ok(steps) if steps <= self.max_steps => {
                self.accumulated -= self.period * steps;
                steps
            }
            _ => {
                self.accumulated = self.remainder(period);
                self.max_steps
            }
        }
    }

    /// Advances by the time since the previous call.
    pub fn advance_to(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last);
        self.last = self.last.max(now);
        self.advance(elapsed)
    }

    /// Returns when the next tick becomes due.
    #[must_use]
    pub fn next_deadline(&self) -> Instant {
        self.last + self.period.saturating_sub(self.accumulated)
    }

    fn remainder(&self, period: u128) -> Duration {
        // The remainder is below `period`, which itself fits in a Duration.
        let nanos = self.accumulated.as_nanos() % period;
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}
