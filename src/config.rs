//! Spin tuning, loaded from the environment on top of the reference defaults.

use std::time::Duration;

use bevy_ecs::resource::Resource;
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::constants::{self, blur, spin};
use crate::easing::{backout, Easing};
use crate::error::ConfigError;
use crate::systems::Blur;

/// Prefix for environment variables overriding [`SpinConfig`] fields, e.g. `REELS_REEL_COUNT`.
pub const ENV_PREFIX: &str = "REELS_";

/// Upper bound on how long any reel may spin, in milliseconds.
pub const MAX_SPIN_MS: u64 = 60 * 60 * 1000;

/// Every tunable of the machine: layout, stagger, easing and blur.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub reel_count: usize,
    pub slots_per_reel: usize,
    /// Size of a square symbol slot, in pixels
    pub slot_size: f32,

    pub base_distance: f32,
    pub distance_step: f32,
    pub base_duration_ms: u64,
    pub duration_step_ms: u64,
    pub extra_duration_ms: u64,
    /// Inclusive upper bound of the random extra distance per reel
    pub max_extra: u32,
    pub backout_amount: f32,

    pub frame_blur_gain: f32,
    pub spin_blur_x: f32,
    pub spin_blur_y: f32,

    /// Seeds the machine's random number generator; drawn from the OS when unset
    pub seed: Option<u64>,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            reel_count: constants::REEL_COUNT,
            slots_per_reel: constants::SLOTS_PER_REEL,
            slot_size: constants::SYMBOL_SIZE,
            base_distance: spin::BASE_DISTANCE,
            distance_step: spin::DISTANCE_STEP,
            base_duration_ms: spin::BASE_DURATION_MS,
            duration_step_ms: spin::DURATION_STEP_MS,
            extra_duration_ms: spin::EXTRA_DURATION_MS,
            max_extra: spin::MAX_EXTRA,
            backout_amount: spin::BACKOUT_AMOUNT,
            frame_blur_gain: blur::FRAME_GAIN,
            spin_blur_x: blur::SPIN_X,
            spin_blur_y: blur::SPIN_Y,
            seed: None,
        }
    }
}

impl SpinConfig {
    /// Loads the configuration from `REELS_*` environment variables over the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Extracts and validates a configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reel_count == 0 {
            return Err(invalid("reel_count", "at least one reel is required"));
        }
        if self.slots_per_reel == 0 {
            return Err(invalid("slots_per_reel", "at least one slot per reel is required"));
        }
        if !(self.slot_size.is_finite() && self.slot_size > 0.0) {
            return Err(invalid("slot_size", format!("must be positive, got {}", self.slot_size)));
        }

        for (field, value) in [
            ("base_distance", self.base_distance),
            ("distance_step", self.distance_step),
            ("backout_amount", self.backout_amount),
            ("frame_blur_gain", self.frame_blur_gain),
            ("spin_blur_x", self.spin_blur_x),
            ("spin_blur_y", self.spin_blur_y),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("must be non-negative, got {value}")));
            }
        }

        // The last reel drawing the largest extra runs longest.
        let longest = self.checked_duration_ms(self.reel_count - 1, self.max_extra);
        if !longest.is_some_and(|ms| ms <= MAX_SPIN_MS) {
            return Err(invalid(
                "base_duration_ms",
                format!(
                    "the longest spin must not exceed {MAX_SPIN_MS}ms (base {}, step {}, extra {} x {})",
                    self.base_duration_ms, self.duration_step_ms, self.max_extra, self.extra_duration_ms
                ),
            ));
        }

        Ok(())
    }

    pub fn easing(&self) -> Easing {
        backout(self.backout_amount)
    }

    /// The blur applied to every reel the moment a spin starts.
    pub fn spin_blur(&self) -> Blur {
        Blur {
            x: self.spin_blur_x,
            y: self.spin_blur_y,
        }
    }

    /// Distance travelled by reel `index` given its random `extra`.
    pub fn distance(&self, index: usize, extra: u32) -> f32 {
        self.base_distance + index as f32 * self.distance_step + extra as f32
    }

    /// Spin duration of reel `index` given its random `extra`, saturating on overflow.
    pub fn duration(&self, index: usize, extra: u32) -> Duration {
        Duration::from_millis(self.checked_duration_ms(index, extra).unwrap_or(u64::MAX))
    }

    fn checked_duration_ms(&self, index: usize, extra: u32) -> Option<u64> {
        let step = (index as u64).checked_mul(self.duration_step_ms)?;
        let extra = u64::from(extra).checked_mul(self.extra_duration_ms)?;
        self.base_duration_ms.checked_add(step)?.checked_add(extra)
    }

    /// The longest a spin can take with this configuration.
    pub fn longest_spin(&self) -> Duration {
        (0..self.reel_count)
            .map(|index| self.duration(index, self.max_extra))
            .max()
            .unwrap_or_default()
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
