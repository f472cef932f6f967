//! Outcomes of registry mutations and connection lifecycle transitions.

use std::fmt;

use crate::domain::foundation::Identity;

/// Result of registering a handle under an identity.
///
/// Registration never fails; the outcome only tells the caller what changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The handle was not known and is now registered.
    Added,
    /// The exact `(identity, handle)` pair was already registered.
    AlreadyRegistered,
    /// The handle was held by another identity and has been moved.
    Moved { previous: Identity },
}

impl Registration {
    /// True if the registry state changed.
    pub fn changed_state(&self) -> bool {
        !matches!(self, Registration::AlreadyRegistered)
    }
}

/// Result of removing a handle from an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deregistration {
    /// The handle was removed. `identity_offline` is true when it was the
    /// identity's last handle and the identity entry was dropped.
    Removed { identity_offline: bool },
    /// The pair was not registered; nothing changed.
    NotRegistered,
}

impl Deregistration {
    /// True if a handle was actually removed.
    pub fn was_removed(&self) -> bool {
        matches!(self, Deregistration::Removed { .. })
    }
}

/// Why a connection left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// Peer sent a close frame or the stream ended.
    ClientClosed,
    /// Server initiated the close during shutdown.
    ServerShutdown,
    /// Transport failed irrecoverably.
    TransportError,
    /// The connection was dropped without an explicit disconnect.
    Dropped,
}

impl DisconnectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisconnectReason::ClientClosed => "client closed",
            DisconnectReason::ServerShutdown => "server shutdown",
            DisconnectReason::TransportError => "transport error",
            DisconnectReason::Dropped => "dropped",
        }
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
