//! Data Transfer Objects for presence endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConnectionHandle, Identity};
use crate::domain::presence::{PresenceEntry, PresenceSnapshot};

/// Response for `GET /api/presence`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceResponse {
    pub online: Vec<PresenceEntry>,
    pub identity_count: usize,
    pub connection_count: usize,
    pub taken_at: String,
}

impl From<PresenceSnapshot> for PresenceResponse {
    fn from(snapshot: PresenceSnapshot) -> Self {
        let stats = snapshot.stats();
        let taken_at = snapshot.taken_at().to_rfc3339();
        Self {
            online: snapshot.into_entries(),
            identity_count: stats.identities,
            connection_count: stats.connections,
            taken_at,
        }
    }
}

/// Response for `GET /api/presence/:identity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityPresenceResponse {
    pub identity: Identity,
    pub online: bool,
    pub handles: Vec<ConnectionHandle>,
}

impl IdentityPresenceResponse {
    pub fn new(identity: Identity, handles: Vec<ConnectionHandle>) -> Self {
        Self {
            identity,
            online: !handles.is_empty(),
            handles,
        }
    }
}
