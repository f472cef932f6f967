//! Log sink backed by the process-wide `tracing` subscriber.

use crate::ports::{LogLevel, LogSink};

/// Emits each notification as a `tracing` event.
///
/// The level tag becomes the event target (`minimarket::socket`,
/// `minimarket::http`, ...) so operators can filter with `RUST_LOG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn notify(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => tracing::info!(target: "minimarket::info", "{}", message),
            LogLevel::Warn => tracing::warn!(target: "minimarket::warn", "{}", message),
            LogLevel::Error => tracing::error!(target: "minimarket::error", "{}", message),
            LogLevel::Http => tracing::info!(target: "minimarket::http", "{}", message),
            LogLevel::Socket => tracing::info!(target: "minimarket::socket", "{}", message),
            LogLevel::Db => tracing::info!(target: "minimarket::db", "{}", message),
        }
    }
}
