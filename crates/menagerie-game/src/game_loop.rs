//! Fixed-timestep simulation loop.
//!
//! Frame times are handed in by the caller, so a scripted session replays
//! identically no matter how fast the host runs it. Leftover time is carried
//! in an accumulator and reported as an interpolation alpha.

use tracing::warn;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame time accepted before clamping (4 FPS).
pub const MAX_FRAME_TIME: f64 = 0.25;

#[derive(Debug, Default)]
pub struct GameLoop {
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame of `frame_time` seconds.
    ///
    /// `update_fn(fixed_dt, update_index)` runs zero or more times at the fixed
    /// rate, then `present_fn(alpha)` runs once with alpha in `[0, 1)`.
    pub fn tick(
        &mut self,
        frame_time: f64,
        mut update_fn: impl FnMut(f64, u64),
        mut present_fn: impl FnMut(f64),
    ) {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT, self.update_count);
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }

        present_fn(self.alpha());
        self.frame_count += 1;
    }

    /// Interpolation alpha left over from the last tick.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / FIXED_DT
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    #[must_use]
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}
