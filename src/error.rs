//! Centralized error types for the reel machine.
//!
//! Rejected spin requests are not errors; they are reported through the return value of
//! [`crate::machine::SlotMachine::request_spin`].

/// Main error type for the reel machine.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// An alphabet was built without any symbols, so nothing could ever be drawn from it.
    #[error("Symbol alphabet is empty")]
    EmptyAlphabet,

    #[error("Invalid texture for {kind}: width {width}")]
    InvalidTexture { kind: String, width: f32 },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("System failed to run: {0}")]
    System(String),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Errors raised while loading or validating a [`crate::config::SpinConfig`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised while setting up the host environment.
#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    #[error("Console initialization failed: {0}")]
    ConsoleInit(String),
}

/// Result type for reel machine operations.
pub type ReelResult<T> = Result<T, ReelError>;
