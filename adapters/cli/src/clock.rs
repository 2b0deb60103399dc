//! Paces loop iterations at the configured tick rate.

use std::{
    thread,
    time::{Duration, Instant},
};

#[derive(Debug)]
pub(crate) struct FrameClock {
    budget: Duration,
    throttled: bool,
    started: Instant,
}

impl FrameClock {
    pub(crate) fn new(budget: Duration, throttled: bool) -> Self {
        Self {
            budget,
            throttled,
            started: Instant::now(),
        }
    }

    pub(crate) fn start(&mut self) {
        self.started = Instant::now();
    }

    /// Sleeps for whatever remains of the frame budget.
    pub(crate) fn finish(&self) {
        if let Some(remaining) = self.remaining(self.started.elapsed()) {
            thread::sleep(remaining);
        }
    }

    fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        if !self.throttled {
            return None;
        }
        self.budget
            .checked_sub(elapsed)
            .filter(|remaining| !remaining.is_zero())
    }
}
