//! Failures while loading or checking configuration.

use thiserror::Error;

/// Configuration could not be turned into an [`AppConfig`](super::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A loaded value is out of range or missing.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("MINIMARKET__{0} must be set")]
    MissingRequired(&'static str),

    #[error("port must be between 1 and 65535")]
    InvalidPort,

    #[error("bind host {0:?} is not an IP address")]
    InvalidBindAddress(String),

    #[error("request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("pool needs 1 <= max_connections and min_connections <= max_connections")]
    InvalidPoolSize,

    #[error("max_connections may not exceed 100")]
    PoolSizeTooLarge,

    #[error("rate limit window and request counts must be positive")]
    InvalidRateLimit,

    #[error("log buffer capacity must be positive")]
    InvalidLogBuffer,
}
