//! In-memory connection registry.
//!
//! Keeps a two-level map `identity → set<handle>` plus a reverse index
//! `handle → identity`, both guarded by a single `RwLock`. The forward map
//! answers "is this identity reachable", the reverse index answers "who owns
//! this connection" and enforces that a handle has exactly one owner.
//!
//! # Thread Safety
//!
//! Snapshot and lookup calls take the read lock and may run concurrently.
//! Register and deregister take the write lock. Nothing here performs I/O or
//! calls back into caller code while a guard is held.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::foundation::{ConnectionHandle, Identity, Timestamp};
use crate::domain::presence::{
    Deregistration, PresenceEntry, PresenceSnapshot, PresenceStats, Registration,
};
use crate::ports::ConnectionRegistry;

/// Registry state behind the lock.
#[derive(Debug, Default)]
struct PresenceTable {
    /// Identity → handles. An entry exists iff its set is non-empty.
    identities: HashMap<Identity, HashSet<ConnectionHandle>>,
    /// Handle → owning identity.
    owners: HashMap<ConnectionHandle, Identity>,
}

impl PresenceTable {
    /// Remove `handle` from `identity`'s set, dropping the entry when empty.
    ///
    /// Returns `None` if the identity did not hold the handle.
    fn detach(&mut self, identity: &Identity, handle: &ConnectionHandle) -> Option<bool> {
        let handles = self.identities.get_mut(identity)?;
        if !handles.remove(handle) {
            return None;
        }
        let now_empty = handles.is_empty();
        if now_empty {
            self.identities.remove(identity);
        }
        Some(now_empty)
    }
}

/// Process-local connection registry.
///
/// Construct one per server and share it behind an `Arc`; independent
/// instances never see each other's state.
#[derive(Debug, Default)]
pub struct InMemoryConnectionRegistry {
    table: RwLock<PresenceTable>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, PresenceTable> {
        self.table.read().unwrap_or_else(|poisoned| {
            tracing::error!("presence registry lock poisoned, recovering for read");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, PresenceTable> {
        self.table.write().unwrap_or_else(|poisoned| {
            tracing::error!("presence registry lock poisoned, recovering for write");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl ConnectionRegistry for InMemoryConnectionRegistry {
    fn register(&self, identity: &Identity, handle: &ConnectionHandle) -> Registration {
        let mut table = self.write();

        let previous = match table.owners.get(handle) {
            Some(owner) if owner == identity => return Registration::AlreadyRegistered,
            Some(owner) => Some(owner.clone()),
            None => None,
        };

        if let Some(previous) = &previous {
            table.detach(previous, handle);
        }

        table
            .identities
            .entry(identity.clone())
            .or_default()
            .insert(handle.clone());
        table.owners.insert(handle.clone(), identity.clone());

        match previous {
            Some(previous) => Registration::Moved { previous },
            None => Registration::Added,
        }
    }

    fn deregister(&self, identity: &Identity, handle: &ConnectionHandle) -> Deregistration {
        let mut table = self.write();

        match table.detach(identity, handle) {
            Some(identity_offline) => {
                table.owners.remove(handle);
                Deregistration::Removed { identity_offline }
            }
            None => Deregistration::NotRegistered,
        }
    }

    fn snapshot(&self) -> PresenceSnapshot {
        let entries: Vec<PresenceEntry> = {
            let table = self.read();
            table
                .identities
                .iter()
                .map(|(identity, handles)| {
                    PresenceEntry::new(identity.clone(), handles.iter().cloned().collect())
                })
                .collect()
        };

        PresenceSnapshot::new(entries, Timestamp::now())
    }

    fn is_online(&self, identity: &Identity) -> bool {
        self.read().identities.contains_key(identity)
    }

    fn handles_of(&self, identity: &Identity) -> Vec<ConnectionHandle> {
        let mut handles: Vec<ConnectionHandle> = self
            .read()
            .identities
            .get(identity)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        handles.sort();
        handles
    }

    fn identity_of(&self, handle: &ConnectionHandle) -> Option<Identity> {
        self.read().owners.get(handle).cloned()
    }

    fn stats(&self) -> PresenceStats {
        let table = self.read();
        PresenceStats {
            identities: table.identities.len(),
            connections: table.owners.len(),
        }
    }
}
