//! Fixed-timestep clock: turns wall-clock frame time into discrete ticks.
//!
//! The engine only understands ticks. The front-end samples the clock once
//! per frame and forwards the tick count to `CareerEngine::tick`.

use std::time::{Duration, Instant};

/// Longest gap credited in one update. A suspended terminal should not
/// replay minutes of ticks at once.
const MAX_FRAME_GAP: Duration = Duration::from_millis(500);

pub struct FrameClock {
    tick_length: Duration,
    accumulator: Duration,
    last: Option<Instant>,
    pub total_ticks: u64,
}

impl FrameClock {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            tick_length: Duration::from_secs(1) / ticks_per_sec.max(1),
            accumulator: Duration::ZERO,
            last: None,
            total_ticks: 0,
        }
    }

    pub fn tick_length(&self) -> Duration {
        self.tick_length
    }

    /// Ticks elapsed since the previous call. The first call returns 0.
    pub fn update(&mut self, now: Instant) -> u32 {
        let delta = match self.last {
            Some(prev) => now.saturating_duration_since(prev).min(MAX_FRAME_GAP),
            None => Duration::ZERO,
        };
        self.last = Some(now);

        self.accumulator += delta;
        let mut ticks = 0;
        while self.accumulator >= self.tick_length {
            self.accumulator -= self.tick_length;
            ticks += 1;
        }
        self.total_ticks += ticks as u64;
        ticks
    }

    /// How long the event loop may block before the next tick is due.
    pub fn until_next_tick(&self) -> Duration {
        self.tick_length.saturating_sub(self.accumulator)
    }
}
