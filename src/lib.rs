//! MiniMarket server - realtime connection presence over WebSocket.
//!
//! The core is a connection registry mapping each identity to the set of
//! transport connections it currently holds. The transport listener reports
//! connect, error and disconnect events through the lifecycle glue, and the
//! HTTP surface exposes read-only presence snapshots.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
