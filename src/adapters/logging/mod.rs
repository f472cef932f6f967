//! Log sink adapters.
//!
//! - `TracingLogSink` - Renders lifecycle events as `tracing` events
//! - `BufferedLogSink` - Decouples callers from a slow sink with a bounded queue

mod buffered;
mod tracing_sink;

pub use buffered::BufferedLogSink;
pub use tracing_sink::TracingLogSink;
