//! Slot machine reel animation: staggered spins driven by a small tween engine.

pub mod app;
pub mod clock;
pub mod config;
pub mod constants;
pub mod easing;
pub mod error;
pub mod events;
pub mod formatter;
pub mod machine;
pub mod platform;
pub mod symbols;
pub mod systems;
pub mod tween;
