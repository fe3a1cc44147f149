//! Frame clocks: the source of "time since start" sampled once per rendered frame.

use std::time::{Duration, Instant};

pub trait FrameClock {
    /// Time elapsed since the clock started, sampled for the current frame.
    fn elapsed(&mut self) -> Duration;
}

/// Wall-clock time, measured from when the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn elapsed(&mut self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to. Used for deterministic playback and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Duration,
    step: Duration,
}

impl ManualClock {
    /// A clock that advances by `step` every time it is sampled.
    pub fn stepping(step: Duration) -> Self {
        Self { now: Duration::ZERO, step }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn now(&self) -> Duration {
        self.now
    }
}

impl FrameClock for ManualClock {
    fn elapsed(&mut self) -> Duration {
        self.now += self.step;
        self.now
    }
}
