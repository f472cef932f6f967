//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `presence` - In-memory connection registry
//! - `identity` - Identity assignment policies
//! - `logging` - Log sinks (tracing, buffered)
//! - `rate_limiter` - Fixed-window rate limiting
//! - `postgres` - Connection pool and health probes
//! - `http` - REST routes and middleware
//! - `websocket` - Realtime presence endpoint

pub mod http;
pub mod identity;
pub mod logging;
pub mod postgres;
pub mod presence;
pub mod rate_limiter;
pub mod websocket;
