//! ConnectionRegistry port - Interface for tracking who is online.
//!
//! Binds ephemeral transport connections (handles) to longer-lived logical
//! identities. A single identity may hold several simultaneous connections
//! (different tabs, different devices).
//!
//! ## Use Case
//!
//! 1. Client connects; the transport assigns a handle
//! 2. Lifecycle glue resolves the identity and calls `register`
//! 3. Any server component calls `snapshot` to enumerate presence
//! 4. Client disconnects; lifecycle glue calls `deregister` once
//!
//! All operations are in-memory and never block on I/O. Implementations must
//! be callable from any number of concurrent transport tasks without external
//! synchronization.

use crate::domain::foundation::{ConnectionHandle, Identity};
use crate::domain::presence::{Deregistration, PresenceSnapshot, PresenceStats, Registration};

/// Port for identity → connection-handle bookkeeping.
///
/// Implementations should:
/// - Keep an identity present iff it has at least one handle
/// - Never hold a handle under two identities at once
/// - Return snapshots that share no state with the live registry
///
/// # Example
///
/// ```ignore
/// // On transport connect:
/// registry.register(&identity, &handle);
///
/// // On transport disconnect (safe to repeat):
/// registry.deregister(&identity, &handle);
///
/// // Anywhere else:
/// for entry in registry.snapshot().entries() {
///     println!("{} via {} connection(s)", entry.identity, entry.handles.len());
/// }
/// ```
pub trait ConnectionRegistry: Send + Sync {
    /// Register `handle` under `identity`.
    ///
    /// Idempotent. If the handle is currently held by another identity it is
    /// moved, so it is never present under both.
    fn register(&self, identity: &Identity, handle: &ConnectionHandle) -> Registration;

    /// Remove `handle` from `identity`.
    ///
    /// Unknown identities, unknown handles and handles held by a different
    /// identity are a no-op, never an error.
    fn deregister(&self, identity: &Identity, handle: &ConnectionHandle) -> Deregistration;

    /// Immutable point-in-time copy of the whole mapping.
    fn snapshot(&self) -> PresenceSnapshot;

    /// Check if an identity has any open connection.
    ///
    /// Cheaper than `snapshot` when you only need one identity.
    fn is_online(&self, identity: &Identity) -> bool;

    /// Handles currently held by `identity`. Empty if offline.
    fn handles_of(&self, identity: &Identity) -> Vec<ConnectionHandle>;

    /// Identity currently owning `handle`, if registered.
    fn identity_of(&self, handle: &ConnectionHandle) -> Option<Identity>;

    /// Current identity and connection counts.
    fn stats(&self) -> PresenceStats;
}
