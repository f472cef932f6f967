//! RateLimiter port - Fixed-window request throttling for the HTTP surface.
//!
//! Two buckets exist: one shared by every request, and one per client IP.
//! The middleware consults both before a request reaches a handler.

use async_trait::async_trait;
use std::fmt;

use crate::domain::foundation::Timestamp;

/// Port for request throttling.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request against `key`, or refuse it when the window is full.
    async fn check(&self, key: &RateLimitKey) -> Result<RateLimitResult, RateLimitError>;

    /// Quota left for `key` without counting a request.
    async fn status(&self, key: &RateLimitKey) -> Result<RateLimitStatus, RateLimitError>;
}

/// Bucket a request is counted in.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum RateLimitKey {
    Global,
    Ip(String),
}

impl RateLimitKey {
    pub fn global() -> Self {
        RateLimitKey::Global
    }

    pub fn ip(ip: &str) -> Self {
        RateLimitKey::Ip(ip.to_string())
    }

    pub fn scope(&self) -> RateLimitScope {
        match self {
            RateLimitKey::Global => RateLimitScope::Global,
            RateLimitKey::Ip(_) => RateLimitScope::Ip,
        }
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitKey::Global => f.write_str("global"),
            RateLimitKey::Ip(ip) => write!(f, "ip:{}", ip),
        }
    }
}

/// Which limit a key is measured against.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum RateLimitScope {
    Global,
    Ip,
}

/// Outcome of [`RateLimiter::check`].
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    Allowed(RateLimitStatus),
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }

    pub fn is_denied(&self) -> bool {
        !self.is_allowed()
    }
}

/// Quota in the current window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    /// End of the current window.
    pub reset_at: Timestamp,
}

/// Why a request was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDenied {
    pub limit: u32,
    /// Whole seconds until the window closes, at least 1.
    pub retry_after_secs: u32,
    pub scope: RateLimitScope,
    /// Text returned to the client.
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_render_with_scope_prefix() {
        assert_eq!(RateLimitKey::global().to_string(), "global");
        assert_eq!(RateLimitKey::ip("10.0.0.1").to_string(), "ip:10.0.0.1");
    }

    #[test]
    fn key_scope_follows_variant() {
        assert_eq!(RateLimitKey::global().scope(), RateLimitScope::Global);
        assert_eq!(RateLimitKey::ip("::1").scope(), RateLimitScope::Ip);
    }

    #[test]
    fn denied_result_is_not_allowed() {
        let denied = RateLimitResult::Denied(RateLimitDenied {
            limit: 1,
            retry_after_secs: 5,
            scope: RateLimitScope::Ip,
            message: "slow down".to_string(),
        });
        assert!(denied.is_denied());
        assert!(!denied.is_allowed());
    }
}
