// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Connector registry.
//!
//! Maps a logical database identifier to what it was resolved to. Only the
//! resolver holds a registry, behind its single mutex; nothing here locks.
//!
//! # Entry Lifecycle
//!
//! ```text
//! (absent) ──resolve──→ Local | Remote | Replica(connector)
//!                                              │
//!                                   shutdown_all() drains
//!                                              ↓
//!                                        connector.close()
//! ```
//!
//! Entries are never removed mid-run. The announced set is the one-shot latch
//! for the mode-selection log line and shares the same lock.

use crate::resolver::ConnectionMode;
use std::collections::{HashMap, HashSet};

/// What an identifier resolved to.
pub(crate) enum RegistryEntry<R> {
    /// Local-only; no live resource.
    Local,
    /// Direct remote connection; no live resource.
    Remote,
    /// Owns the live replica connector.
    Replica(R),
}

impl<R> RegistryEntry<R> {
    pub(crate) fn mode(&self) -> ConnectionMode {
        match self {
            Self::Local => ConnectionMode::Local,
            Self::Remote => ConnectionMode::Remote,
            Self::Replica(_) => ConnectionMode::EmbeddedReplica,
        }
    }
}

/// Registry state guarded by the resolver's mutex.
pub(crate) struct Registry<R> {
    entries: HashMap<String, RegistryEntry<R>>,
    announced: HashSet<String>,
    closed: bool,
}

impl<R> Default for Registry<R> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            announced: HashSet::new(),
            closed: false,
        }
    }
}

impl<R> Registry<R> {
    /// Latch the diagnostic line for `identifier`.
    ///
    /// Returns `true` exactly once per identifier.
    pub(crate) fn announce_once(&mut self, identifier: &str) -> bool {
        if self.announced.contains(identifier) {
            return false;
        }
        self.announced.insert(identifier.to_string())
    }

    /// The live connector for `identifier`, if one exists.
    pub(crate) fn replica(&self, identifier: &str) -> Option<&R> {
        match self.entries.get(identifier) {
            Some(RegistryEntry::Replica(replica)) => Some(replica),
            _ => None,
        }
    }

    pub(crate) fn mode(&self, identifier: &str) -> Option<ConnectionMode> {
        self.entries.get(identifier).map(RegistryEntry::mode)
    }

    /// Record a sentinel resolution. Never downgrades a live replica.
    pub(crate) fn mark(&mut self, identifier: &str, entry: RegistryEntry<R>) {
        if self.replica(identifier).is_some() {
            return;
        }
        self.entries.insert(identifier.to_string(), entry);
    }

    /// Register a freshly created connector.
    pub(crate) fn insert_replica(&mut self, identifier: &str, replica: R) {
        self.entries
            .insert(identifier.to_string(), RegistryEntry::Replica(replica));
    }

    /// Number of live connectors.
    pub(crate) fn live_replicas(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, RegistryEntry::Replica(_)))
            .count()
    }

    /// Take every live connector out of the registry, sorted by identifier.
    pub(crate) fn drain_replicas(&mut self) -> Vec<(String, R)> {
        let ids: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| matches!(e, RegistryEntry::Replica(_)))
            .map(|(id, _)| id.clone())
            .collect();

        let mut drained = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(RegistryEntry::Replica(replica)) = self.entries.remove(&id) {
                drained.push((id, replica));
            }
        }
        drained.sort_by(|a, b| a.0.cmp(&b.0));
        drained
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }
}
