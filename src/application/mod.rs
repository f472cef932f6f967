//! Application layer - Orchestration between transport events and ports.
//!
//! - `lifecycle` - Connect / error / disconnect glue over the connection registry

pub mod lifecycle;

pub use lifecycle::{ConnectionLifecycle, LiveConnection};
