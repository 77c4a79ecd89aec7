//! Clock sources that supply `dt` to the simulation each frame

use std::time::{Duration, Instant};

/// Supplies the elapsed time for the next simulation step
pub trait FrameClock {
    /// Seconds since the previous call (the simulator clamps it)
    fn next_dt(&mut self) -> f32;
}

/// Fixed step, independent of real time (deterministic capture)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    dt: f32,
}

impl FixedClock {
    pub fn new(dt: f32) -> Self {
        Self { dt }
    }

    /// Step for a target rate in Hz
    pub fn from_hz(hz: f32) -> Self {
        Self::new(1.0 / hz)
    }
}

impl FrameClock for FixedClock {
    fn next_dt(&mut self) -> f32 {
        self.dt
    }
}

/// Measures real elapsed time and paces frames to a target rate
#[derive(Debug)]
pub struct WallClock {
    last: Instant,
    frame: Duration,
}

impl WallClock {
    pub fn new(target_hz: f32) -> Self {
        Self {
            last: Instant::now(),
            frame: Duration::from_secs_f32(1.0 / target_hz),
        }
    }

    /// Sleep until one target frame has passed since the last tick
    fn pace(&self) {
        let spent = self.last.elapsed();
        if spent < self.frame {
            std::thread::sleep(self.frame - spent);
        }
    }
}

impl FrameClock for WallClock {
    fn next_dt(&mut self) -> f32 {
        self.pace();
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}
