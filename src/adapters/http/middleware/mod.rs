//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `cors` - CORS policy built from the configured origin list
//! - `rate_limit` - Fixed-window per-IP and global request limits
//! - `request_log` - One `http` log event per completed request

pub mod cors;
pub mod rate_limit;
pub mod request_log;

pub use cors::cors_layer;
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
pub use request_log::{request_log_middleware, RequestLogState};
