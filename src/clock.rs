//! Tick source for the sampling loop.
//!
//! The loop only cares about minute-truncated timestamps (one tick per
//! minute) and a way to pause between iterations. Abstracting both behind a
//! trait lets tests drive tick progression without real sleeps.

use std::time::Duration;

use chrono::{DateTime, Local, Timelike};

/// Provides minute-resolution timestamps and the inter-iteration pause.
pub trait Clock {
    /// Current local time truncated to the minute.
    fn now_minute(&self) -> DateTime<Local>;

    /// Pause between loop iterations.
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock implementation used in production.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_minute(&self) -> DateTime<Local> {
        truncate_to_minute(Local::now())
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Truncate a timestamp to its minute (seconds and sub-seconds zeroed).
pub fn truncate_to_minute(t: DateTime<Local>) -> DateTime<Local> {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Scripted clock for tests: time only moves when the test advances it.
#[cfg(test)]
pub struct ManualClock {
    now: std::rc::Rc<std::cell::Cell<DateTime<Local>>>,
}

#[cfg(test)]
impl ManualClock {
    /// Returns the clock plus a shared handle for advancing it.
    pub fn starting_at(
        start: DateTime<Local>,
    ) -> (Self, std::rc::Rc<std::cell::Cell<DateTime<Local>>>) {
        let now = std::rc::Rc::new(std::cell::Cell::new(start));
        (Self { now: now.clone() }, now)
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_minute(&self) -> DateTime<Local> {
        truncate_to_minute(self.now.get())
    }

    fn sleep(&mut self, _duration: Duration) {}
}
