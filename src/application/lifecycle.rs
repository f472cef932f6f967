//! Connection lifecycle glue between the transport listener and the registry.
//!
//! The transport reports three events per connection: connect, error and
//! disconnect. This module turns them into registry calls and log events:
//!
//! ```text
//! on_connect ──► resolve identity ──► register ──► "Client connected"
//! on_error   ──► "Socket error"     (registry untouched)
//! on_disconnect / drop ──► deregister once ──► "Client disconnected"
//! ```
//!
//! Registry calls run first and finish before any log event is emitted, so
//! the sink never runs while the registry lock is held.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::foundation::{ConnectionHandle, Identity, Timestamp};
use crate::domain::presence::{Deregistration, DisconnectReason, Registration};
use crate::ports::{ConnectContext, ConnectionRegistry, IdentityResolver, LogLevel, LogSink};

/// Shared services the lifecycle calls into.
struct LifecycleDeps {
    registry: Arc<dyn ConnectionRegistry>,
    resolver: Arc<dyn IdentityResolver>,
    sink: Arc<dyn LogSink>,
}

impl LifecycleDeps {
    /// Deliver a log event. A panicking sink is contained here.
    fn emit(&self, level: LogLevel, message: &str) {
        let delivered = catch_unwind(AssertUnwindSafe(|| self.sink.notify(level, message)));
        if delivered.is_err() {
            tracing::error!(%level, "log sink panicked while delivering lifecycle event");
        }
    }

    /// Run a registry call, turning a panic into a logged invariant fault.
    fn guarded<T>(&self, operation: &str, call: impl FnOnce() -> T) -> Option<T> {
        match catch_unwind(AssertUnwindSafe(call)) {
            Ok(value) => Some(value),
            Err(_) => {
                self.emit(
                    LogLevel::Error,
                    &format!("presence registry invariant violated during {}", operation),
                );
                None
            }
        }
    }
}

/// Binds transport events to the [`ConnectionRegistry`].
///
/// Cheap to clone; every clone shares the same registry, resolver and sink.
#[derive(Clone)]
pub struct ConnectionLifecycle {
    deps: Arc<LifecycleDeps>,
}

impl ConnectionLifecycle {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        resolver: Arc<dyn IdentityResolver>,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            deps: Arc::new(LifecycleDeps {
                registry,
                resolver,
                sink,
            }),
        }
    }

    /// The registry this lifecycle mutates.
    pub fn registry(&self) -> &Arc<dyn ConnectionRegistry> {
        &self.deps.registry
    }

    /// Handle a new transport connection.
    ///
    /// Resolves the identity, registers the handle and emits a connect event.
    /// The returned [`LiveConnection`] deregisters itself exactly once, either
    /// through [`on_disconnect`](Self::on_disconnect) or when dropped.
    pub fn on_connect(&self, context: ConnectContext) -> LiveConnection {
        let deps = &self.deps;
        let identity = deps.resolver.resolve(&context);
        let handle = context.handle;

        let outcome = deps.guarded("register", || deps.registry.register(&identity, &handle));

        match outcome {
            Some(Registration::Moved { previous }) => deps.emit(
                LogLevel::Warn,
                &format!(
                    "Handle {} moved from identity {} to {}",
                    handle, previous, identity
                ),
            ),
            Some(Registration::AlreadyRegistered) => deps.emit(
                LogLevel::Warn,
                &format!("Handle {} was already registered to {}", handle, identity),
            ),
            Some(Registration::Added) | None => {}
        }

        deps.emit(
            LogLevel::Socket,
            &format!("Client connected: {} (identity {})", handle, identity),
        );

        LiveConnection {
            identity,
            handle,
            connected_at: Timestamp::now(),
            closed: AtomicBool::new(false),
            deps: self.deps.clone(),
        }
    }

    /// Report a transport error for a live connection.
    ///
    /// Only logs. The registry is changed by the disconnect that follows, not
    /// by the error itself.
    pub fn on_error(&self, connection: &LiveConnection, error: &dyn fmt::Display) {
        self.deps.emit(
            LogLevel::Error,
            &format!("Socket error on {}: {}", connection.handle, error),
        );
    }

    /// Report that the transport closed a connection.
    ///
    /// Returns true if this call performed the deregistration, false if the
    /// connection had already been closed.
    pub fn on_disconnect(&self, connection: &LiveConnection, reason: DisconnectReason) -> bool {
        connection.close(reason)
    }
}

/// One registered transport connection.
///
/// Owns the `(identity, handle)` pair and guarantees a single deregistration
/// for it, whatever order close, error and drop happen in.
pub struct LiveConnection {
    identity: Identity,
    handle: ConnectionHandle,
    connected_at: Timestamp,
    closed: AtomicBool,
    deps: Arc<LifecycleDeps>,
}

impl LiveConnection {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn handle(&self) -> &ConnectionHandle {
        &self.handle
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Deregister once. Later calls are no-ops returning false.
    fn close(&self, reason: DisconnectReason) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }

        let deps = &self.deps;
        let outcome = deps.guarded("deregister", || {
            deps.registry.deregister(&self.identity, &self.handle)
        });

        if outcome == Some(Deregistration::NotRegistered) {
            tracing::debug!(
                handle = %self.handle,
                identity = %self.identity,
                "handle already absent at disconnect"
            );
        }

        deps.emit(
            LogLevel::Socket,
            &format!("Client disconnected: {} ({})", self.handle, reason),
        );
        true
    }
}

impl Drop for LiveConnection {
    fn drop(&mut self) {
        self.close(DisconnectReason::Dropped);
    }
}

impl fmt::Debug for LiveConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveConnection")
            .field("identity", &self.identity)
            .field("handle", &self.handle)
            .field("connected_at", &self.connected_at)
            .field("closed", &self.is_closed())
            .finish()
    }
}
