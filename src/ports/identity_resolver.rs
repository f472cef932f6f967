//! IdentityResolver port - Decides which identity a new connection belongs to.
//!
//! Identity assignment is a policy input, not something the registry knows
//! about. An authentication collaborator would plug in here; without one the
//! connection's own handle is used.

use std::net::SocketAddr;

use crate::domain::foundation::{ConnectionHandle, Identity};

/// Everything known about a connection at accept time.
#[derive(Debug, Clone)]
pub struct ConnectContext {
    /// Handle assigned by the transport listener.
    pub handle: ConnectionHandle,
    /// Identity the client asked for, unverified.
    pub claimed_identity: Option<String>,
    /// Peer socket address, when the server exposes it.
    pub remote_addr: Option<SocketAddr>,
}

impl ConnectContext {
    /// Context with only a handle.
    pub fn new(handle: ConnectionHandle) -> Self {
        Self {
            handle,
            claimed_identity: None,
            remote_addr: None,
        }
    }

    pub fn with_claimed_identity(mut self, identity: impl Into<String>) -> Self {
        self.claimed_identity = Some(identity.into());
        self
    }

    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }
}

/// Port for identity assignment policy.
pub trait IdentityResolver: Send + Sync {
    /// Resolve the identity for a freshly accepted connection.
    ///
    /// Infallible: a resolver that cannot decide falls back to the handle.
    fn resolve(&self, context: &ConnectContext) -> Identity;
}
