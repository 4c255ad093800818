//! Frame timing.
//!
//! Converts wall-clock deltas into a whole number of fixed simulation steps
//! and optionally paces the loop to the target frame rate.

use std::time::{Duration, Instant};

/// Largest wall-clock delta accepted in one call, in ms.
const MAX_DELTA_MS: f32 = 250.0;

/// Most fixed steps handed out by one [`FrameTiming::accumulate`] call.
const MAX_UPDATES: u32 = 10;

/// Fixed-timestep accumulator.
#[derive(Debug)]
pub struct FrameTiming {
    /// Target frames per second
    target_fps: u32,
    /// Time budget per frame
    frame_budget: Duration,
    /// Time of last frame start
    last_frame: Instant,
    /// Unsimulated time, in ms
    accumulator_ms: f32,
    /// Fixed step length, in ms
    fixed_dt_ms: f32,
    /// Time thrown away because the loop fell too far behind, in ms
    dropped_ms: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameTiming {
    /// Create a timing manager stepping at `target_fps`.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            target_fps,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            last_frame: Instant::now(),
            accumulator_ms: 0.0,
            fixed_dt_ms: 1000.0 / target_fps as f32,
            dropped_ms: 0.0,
        }
    }

    /// Fixed step length in ms.
    #[must_use]
    pub fn fixed_dt_ms(&self) -> f32 {
        self.fixed_dt_ms
    }

    /// Target frame rate.
    #[must_use]
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Unsimulated time carried to the next call.
    #[must_use]
    pub fn accumulator_ms(&self) -> f32 {
        self.accumulator_ms
    }

    /// Total time discarded to catch up.
    #[must_use]
    pub fn dropped_ms(&self) -> f32 {
        self.dropped_ms
    }

    /// Wall-clock time since the previous call, clamped, in ms.
    pub fn delta_time_ms(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;
        dt.min(MAX_DELTA_MS)
    }

    /// Adds `dt_ms` and returns how many fixed steps to run now.
    pub fn accumulate(&mut self, dt_ms: f32) -> u32 {
        if dt_ms.is_finite() {
            self.accumulator_ms += dt_ms.clamp(0.0, MAX_DELTA_MS);
        }

        let mut count = 0;
        while self.accumulator_ms >= self.fixed_dt_ms && count < MAX_UPDATES {
            self.accumulator_ms -= self.fixed_dt_ms;
            count += 1;
        }

        // Still behind after the cap: drop the backlog
        if self.accumulator_ms > self.fixed_dt_ms * 2.0 {
            self.dropped_ms += self.accumulator_ms;
            self.accumulator_ms = 0.0;
        }

        count
    }

    /// Sleep for whatever is left of the frame budget.
    pub fn sleep_remainder(&self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }

    /// Reset timing (call before starting a loop).
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.accumulator_ms = 0.0;
        self.dropped_ms = 0.0;
    }
}
