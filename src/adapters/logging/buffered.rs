//! Non-blocking log sink wrapper.
//!
//! Callers hand records to a bounded channel and return immediately. A
//! background task drains the channel into the wrapped sink. When the queue
//! is full, or the drain task is gone, the record is dropped and counted.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::ports::{LogLevel, LogSink};

#[derive(Debug)]
struct LogRecord {
    level: LogLevel,
    message: String,
}

/// Bounded, drop-on-full front for another [`LogSink`].
#[derive(Debug, Clone)]
pub struct BufferedLogSink {
    tx: mpsc::Sender<LogRecord>,
    dropped: Arc<AtomicU64>,
}

impl BufferedLogSink {
    /// Spawn the drain task on the current tokio runtime.
    ///
    /// The task exits once every clone of the returned sink is dropped.
    pub fn spawn(inner: Arc<dyn LogSink>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<LogRecord>(capacity.max(1));

        let drain = tokio::spawn(async move {
            while let Some(record) = rx.recv().await {
                let delivered = catch_unwind(AssertUnwindSafe(|| {
                    inner.notify(record.level, &record.message)
                }));
                if delivered.is_err() {
                    tracing::error!(level = %record.level, "log sink panicked, record lost");
                }
            }
        });

        let sink = Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (sink, drain)
    }
}

impl LogSink for BufferedLogSink {
    fn notify(&self, level: LogLevel, message: &str) {
        let record = LogRecord {
            level,
            message: message.to_string(),
        };
        if self.tx.try_send(record).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records discarded because the queue was full or closed.
    fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
