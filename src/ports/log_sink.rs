//! LogSink port - Fire-and-forget lifecycle notifications.
//!
//! The sink receives human-readable events (connect, disconnect, error,
//! request summaries). Delivery is best-effort: a slow or failing sink must
//! never block its caller or affect registry correctness.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag attached to every notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    /// HTTP request summaries.
    Http,
    /// Realtime connection lifecycle.
    Socket,
    /// Database pool lifecycle.
    Db,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Http => "http",
            LogLevel::Socket => "socket",
            LogLevel::Db => "db",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port for lifecycle log delivery.
///
/// `notify` has no return value on purpose: callers cannot react to sink
/// failures, so implementations swallow their own errors.
pub trait LogSink: Send + Sync {
    /// Deliver one event. Must not block on I/O.
    fn notify(&self, level: LogLevel, message: &str);

    /// Events accepted by `notify` but never delivered. Sinks that deliver
    /// synchronously lose nothing.
    fn dropped(&self) -> u64 {
        0
    }
}
