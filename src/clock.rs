//! Frame timing.

use std::time::{Duration, Instant};

/// Largest delta a single frame may report, in seconds.
///
/// Long stalls (debugger pauses, window drags) otherwise turn into one huge
/// simulation step.
pub const MAX_DELTA: f32 = 0.1;

/// Source of frame deltas and wall-clock timestamps.
///
/// [`SystemClock`] is the real implementation; tests drive the runtime with
/// a manually stepped clock.
pub trait Clock {
    /// Wait out the remainder of the frame budget for `target_fps` and
    /// return the elapsed time since the previous tick, in seconds, capped
    /// at [`MAX_DELTA`].
    fn tick(&mut self, target_fps: u32) -> f32;

    /// Seconds elapsed since the clock was created.
    fn now(&self) -> f64;
}

/// Wall clock backed by [`std::time::Instant`], sleeping to hold the frame
/// cap.
pub struct SystemClock {
    start: Instant,
    last_tick: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn tick(&mut self, target_fps: u32) -> f32 {
        if target_fps > 0 {
            let budget = Duration::from_secs_f64(1.0 / target_fps as f64);
            let spent = self.last_tick.elapsed();
            if spent < budget {
                std::thread::sleep(budget - spent);
            }
        }
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta.min(MAX_DELTA)
    }

    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_tick_reports_real_elapsed_time() {
        let mut clock = SystemClock::new();
        std::thread::sleep(Duration::from_millis(5));
        let dt = clock.tick(0);
        assert!(dt >= 0.005);
        assert!(dt <= MAX_DELTA);
    }

    #[test]
    fn now_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
