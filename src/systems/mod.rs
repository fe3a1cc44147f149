//! The Entity-Component-System (ECS) module.
//!
//! This module contains the reel components and resources, and the systems that advance them
//! once per frame.

pub mod components;
pub mod profiling;
pub mod recycle;
pub mod render;
pub mod spin;
pub mod tween;

pub use self::components::*;
pub use self::profiling::*;
pub use self::recycle::*;
pub use self::render::*;
pub use self::spin::*;
pub use self::tween::*;
