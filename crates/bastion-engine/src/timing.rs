//! Frame timing for the fixed-rate simulation loop.
//!
//! Wall-clock frame deltas are fed into an accumulator that is drained in
//! whole simulation ticks. Long stalls are clamped so the loop never tries
//! to catch up on more than a handful of ticks at once.

use std::time::{Duration, Instant};

/// Most ticks run for one frame.
pub const MAX_TICKS_PER_FRAME: u32 = 10;

/// Longest wall-clock frame fed into the accumulator, in seconds.
const MAX_FRAME_SECS: f32 = 0.25;

/// Simulation milliseconds covered by `ticks` ticks at `tick_rate`.
///
/// Computed from the tick count rather than summed, so the clock never
/// drifts.
#[must_use]
pub fn ticks_to_ms(ticks: u64, tick_rate: u32) -> u64 {
    ticks.saturating_mul(1000) / u64::from(tick_rate.max(1))
}

/// Turns wall-clock frames into a count of fixed simulation ticks.
#[derive(Debug)]
pub struct FrameTiming {
    /// Wall-clock time budget per tick
    tick_budget: Duration,
    /// Time of last frame start
    last_frame: Instant,
    /// Unspent frame time in seconds
    accumulator: f32,
    /// Length of one tick in seconds
    tick_secs: f32,
}

impl FrameTiming {
    /// Create a timer ticking `tick_rate` times a second.
    #[must_use]
    pub fn new(tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        Self {
            tick_budget: Duration::from_secs_f64(1.0 / f64::from(tick_rate)),
            last_frame: Instant::now(),
            accumulator: 0.0,
            tick_secs: 1.0 / tick_rate as f32,
        }
    }

    /// Seconds since the previous call, clamped to a quarter second.
    pub fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt.min(MAX_FRAME_SECS)
    }

    /// Adds `dt` seconds and returns how many ticks are now due.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut count = 0;

        while self.accumulator >= self.tick_secs && count < MAX_TICKS_PER_FRAME {
            self.accumulator -= self.tick_secs;
            count += 1;
        }

        // Still behind after the cap: drop the backlog
        if self.accumulator > self.tick_secs * 2.0 {
            self.accumulator = 0.0;
        }

        count
    }

    /// Sleep for whatever is left of this tick's budget.
    pub fn sleep_remainder(&self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.tick_budget {
            std::thread::sleep(self.tick_budget - elapsed);
        }
    }
}
