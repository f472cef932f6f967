//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Presence Ports
//!
//! - `ConnectionRegistry` - Identity → connection-handle bookkeeping
//! - `IdentityResolver` - Identity assignment policy for new connections
//! - `LogSink` - Fire-and-forget lifecycle notifications
//!
//! ## Infrastructure Ports
//!
//! - `RateLimiter` - Fixed-window request throttling
//! - `DatabaseHealth` - Pool reachability and sizing

mod connection_registry;
mod database_health;
mod identity_resolver;
mod log_sink;
mod rate_limiter;

pub use connection_registry::ConnectionRegistry;
pub use database_health::{DatabaseError, DatabaseHealth, PoolStats};
pub use identity_resolver::{ConnectContext, IdentityResolver};
pub use log_sink::{LogLevel, LogSink};
pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};
