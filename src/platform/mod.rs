//! Host services: console logging, frame pacing and OS randomness.

mod desktop;
pub use desktop::*;
