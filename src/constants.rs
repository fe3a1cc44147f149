//! This module contains the reference values used by the reel machine.

use std::time::Duration;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The number of reels on the machine.
pub const REEL_COUNT: usize = 3;
/// The number of symbol slots carried by each reel.
pub const SLOTS_PER_REEL: usize = 3;
/// The size of a single symbol slot, in pixels. Slots are square.
pub const SYMBOL_SIZE: f32 = 180.0;

/// Tuning for the staggered spin.
pub mod spin {
    /// Distance every reel travels, in slots.
    pub const BASE_DISTANCE: f32 = 20.0;
    /// Additional distance per reel index, in slots.
    pub const DISTANCE_STEP: f32 = 10.0;
    /// Duration of the first reel's spin, in milliseconds.
    pub const BASE_DURATION_MS: u64 = 1500;
    /// Additional duration per reel index, in milliseconds.
    pub const DURATION_STEP_MS: u64 = 300;
    /// Additional duration per unit of random extra distance, in milliseconds.
    pub const EXTRA_DURATION_MS: u64 = 500;
    /// Upper bound (inclusive) of the random extra distance drawn per reel.
    pub const MAX_EXTRA: u32 = 2;
    /// Overshoot amount of the backout easing curve.
    pub const BACKOUT_AMOUNT: f32 = 0.5;
}

/// Tuning for the motion blur applied to moving reels.
pub mod blur {
    /// Multiplier applied to the per-frame position delta.
    pub const FRAME_GAIN: f32 = 8.0;
    /// Horizontal blur applied when a spin starts.
    pub const SPIN_X: f32 = 5.0;
    /// Vertical blur applied when a spin starts.
    pub const SPIN_Y: f32 = 10.0;
}
