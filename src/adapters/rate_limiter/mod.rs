//! Rate limiter adapters.
//!
//! Implementations of the RateLimiter port.
//!
//! - `InMemoryRateLimiter` - Fixed-window counters for a single server process
//!
//! ## Usage
//!
//! ```ignore
//! use minimarket_server::adapters::rate_limiter::InMemoryRateLimiter;
//! use minimarket_server::config::RateLimitConfig;
//!
//! let limiter = InMemoryRateLimiter::new(RateLimitConfig::default());
//! ```

mod in_memory;

pub use in_memory::InMemoryRateLimiter;
