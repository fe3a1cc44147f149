//! Desktop platform implementation.

use std::time::Duration;

use rand::rngs::ThreadRng;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::error::PlatformError;
use crate::formatter::FrameFormatter;

/// Sleeps out the rest of a frame, spinning for the last stretch for tighter pacing.
pub fn sleep(duration: Duration) {
    spin_sleep::sleep(duration);
}

/// Installs the global tracing subscriber.
///
/// Verbosity comes from `RUST_LOG`, defaulting to `debug`.
pub fn init_console() -> Result<(), PlatformError> {
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true).event_format(FrameFormatter))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| PlatformError::ConsoleInit(format!("Failed to set tracing subscriber: {}", e)))?;

    Ok(())
}

pub fn rng() -> ThreadRng {
    rand::rng()
}
