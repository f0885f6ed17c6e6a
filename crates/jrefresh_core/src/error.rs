//! Configuration error types

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration text is not valid TOML for [`RefreshConfig`](crate::RefreshConfig)
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Damping ratio outside `(0, 1]`
    #[error("Damping ratio must be in (0, 1], got {0}")]
    InvalidDampingRatio(f32),

    /// A distance that must be positive and finite is not
    #[error("Distance `{name}` must be positive and finite, got {value}")]
    InvalidDistance { name: &'static str, value: f32 },

    /// A snap duration of zero
    #[error("Duration `{0}` must be at least 1ms")]
    InvalidDuration(&'static str),

    /// Negative or non-finite touch slop
    #[error("Touch slop must be non-negative and finite, got {0}")]
    InvalidTouchSlop(f32),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
