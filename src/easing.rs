//! Easing curves mapping linear progress to perceived progress.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Easing {
    Linear,
    /// Overshoots past the end value before settling back onto it.
    Backout { amount: f32 },
}

impl Easing {
    /// Applies the curve to `t`, which is clamped to `[0, 1]` first.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Backout { amount } => backout_curve(amount, t),
        }
    }
}

/// Shorthand for [`Easing::Backout`].
pub fn backout(amount: f32) -> Easing {
    Easing::Backout { amount }
}

/// `f(t) = (t - 1)^2 * ((amount + 1)(t - 1) + amount) + 1`
pub fn backout_curve(amount: f32, t: f32) -> f32 {
    let s = t - 1.0;
    s * s * ((amount + 1.0) * s + amount) + 1.0
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from * (1.0 - t) + to * t
}
