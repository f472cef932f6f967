//! HTTP throttling settings.

use serde::Deserialize;

use super::error::ValidationError;

/// Fixed-window limits applied by the rate limit middleware.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// When false the middleware is not installed at all.
    pub enabled: bool,

    pub window_secs: u32,

    /// Requests per client IP per window.
    pub max_requests: u32,

    /// Requests across every client per window.
    pub global_max_requests: u32,

    /// Body message of a per-IP `429`.
    pub message: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_secs: 10 * 60,
            max_requests: 100,
            global_max_requests: 10_000,
            message: "Too many requests from this IP, please try again after 10 minutes"
                .to_string(),
        }
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let counts = [self.window_secs, self.max_requests, self.global_max_requests];
        if counts.contains(&0) {
            return Err(ValidationError::InvalidRateLimit);
        }
        Ok(())
    }
}
