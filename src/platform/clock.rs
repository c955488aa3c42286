//! Fixed-step frame accumulator

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Converts variable display frame deltas into whole simulation ticks
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame delta (seconds) and return how many ticks to run now.
    /// Time the substep cap could not consume is dropped, never replayed.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        self.accumulator = self.accumulator.min(SIM_DT);
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Leftover time waiting for the next tick
    pub fn pending(&self) -> f32 {
        self.accumulator
    }
}
