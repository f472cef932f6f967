//! Point-in-time presence snapshots.
//!
//! A snapshot owns its data. Nothing in it points back into the registry, so
//! callers may mutate or hold it as long as they like without affecting, or
//! being affected by, later registry changes.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConnectionHandle, Identity, Timestamp};

/// One online identity and the handles it is reachable through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntryFields")]
pub struct PresenceEntry {
    pub identity: Identity,
    pub handles: Vec<ConnectionHandle>,
}

impl PresenceEntry {
    /// Creates an entry with handles in sorted order.
    pub fn new(identity: Identity, mut handles: Vec<ConnectionHandle>) -> Self {
        handles.sort();
        Self { identity, handles }
    }
}

/// Immutable copy of the registry mapping at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SnapshotFields")]
pub struct PresenceSnapshot {
    #[serde(rename = "online")]
    entries: Vec<PresenceEntry>,
    taken_at: Timestamp,
}

impl PresenceSnapshot {
    /// Builds a snapshot; entries are ordered by identity.
    pub fn new(mut entries: Vec<PresenceEntry>, taken_at: Timestamp) -> Self {
        entries.sort_by(|a, b| a.identity.cmp(&b.identity));
        Self { entries, taken_at }
    }

    /// Snapshot of an empty registry.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Timestamp::now())
    }

    pub fn entries(&self) -> &[PresenceEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PresenceEntry> {
        self.entries
    }

    pub fn taken_at(&self) -> Timestamp {
        self.taken_at
    }

    /// Number of online identities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total handles across all identities.
    pub fn connection_count(&self) -> usize {
        self.entries.iter().map(|e| e.handles.len()).sum()
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.entry(identity).is_some()
    }

    /// Handles held by `identity` at snapshot time, if it was online.
    pub fn handles_of(&self, identity: &Identity) -> Option<&[ConnectionHandle]> {
        self.entry(identity).map(|e| e.handles.as_slice())
    }

    fn entry(&self, identity: &Identity) -> Option<&PresenceEntry> {
        self.entries
            .binary_search_by(|e| e.identity.cmp(identity))
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Counts derived from this snapshot.
    pub fn stats(&self) -> PresenceStats {
        PresenceStats {
            identities: self.len(),
            connections: self.connection_count(),
        }
    }
}

// Deserialization goes through the constructors so lookups, which binary
// search, always see sorted data.

#[derive(Deserialize)]
struct EntryFields {
    identity: Identity,
    handles: Vec<ConnectionHandle>,
}

impl From<EntryFields> for PresenceEntry {
    fn from(fields: EntryFields) -> Self {
        PresenceEntry::new(fields.identity, fields.handles)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotFields {
    online: Vec<PresenceEntry>,
    taken_at: Timestamp,
}

impl From<SnapshotFields> for PresenceSnapshot {
    fn from(fields: SnapshotFields) -> Self {
        PresenceSnapshot::new(fields.online, fields.taken_at)
    }
}

/// Cardinality of the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceStats {
    /// Identities with at least one open connection.
    pub identities: usize,
    /// Open connections across all identities.
    pub connections: usize,
}
