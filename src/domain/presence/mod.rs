//! Presence domain: who is online, and through which connections.
//!
//! The registry itself lives behind the [`ConnectionRegistry`] port; this
//! module holds the value types that flow through it.
//!
//! [`ConnectionRegistry`]: crate::ports::ConnectionRegistry

mod outcome;
mod snapshot;

pub use outcome::{Deregistration, DisconnectReason, Registration};
pub use snapshot::{PresenceEntry, PresenceSnapshot, PresenceStats};
