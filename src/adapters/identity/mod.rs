//! Identity resolver adapters.
//!
//! - `HandleIdentityResolver` - Every connection is its own identity
//! - `ClaimedIdentityResolver` - Trusts the identity a client asks for
//!
//! Neither performs authentication. A resolver backed by a real auth
//! provider would implement the same port.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::foundation::Identity;
use crate::ports::{ConnectContext, IdentityResolver};

/// How new connections are attributed to identities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    /// Identity is the connection handle.
    #[default]
    Handle,
    /// Identity comes from the client's `identity` query parameter.
    Claimed,
}

impl IdentityMode {
    /// Build the resolver for this mode.
    pub fn resolver(self) -> Arc<dyn IdentityResolver> {
        match self {
            IdentityMode::Handle => Arc::new(HandleIdentityResolver),
            IdentityMode::Claimed => Arc::new(ClaimedIdentityResolver),
        }
    }
}

/// Binds each connection to an identity equal to its own handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandleIdentityResolver;

impl IdentityResolver for HandleIdentityResolver {
    fn resolve(&self, context: &ConnectContext) -> Identity {
        Identity::from(&context.handle)
    }
}

/// Uses the client-claimed identity, falling back to the handle.
///
/// Blank claims (empty or whitespace only) are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimedIdentityResolver;

impl IdentityResolver for ClaimedIdentityResolver {
    fn resolve(&self, context: &ConnectContext) -> Identity {
        context
            .claimed_identity
            .as_deref()
            .map(str::trim)
            .and_then(|claim| Identity::new(claim).ok())
            .unwrap_or_else(|| Identity::from(&context.handle))
    }
}
