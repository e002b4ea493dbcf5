//! Presence registry: which connections are online under which display name.
//!
//! ## Concurrency
//!
//! Every connection runs its own task, so joins and leaves for different (or the
//! same) names arrive in parallel. The registry keeps two concurrent maps:
//!
//! - `entries`: display name -> set of connection ids. Mutations of one entry
//!   happen under that entry's shard lock; different names proceed in parallel.
//! - `owners`: connection id -> display name (reverse index), so a leave does not
//!   scan every entry.
//!
//! An entry is only ever removed inside `remove_if_mut`, i.e. while holding the
//! entry lock and after confirming the set is empty. A join that races with that
//! removal either lands before it (the set is not empty, the entry survives) or
//! after it (`entry().or_default()` creates a fresh entry). No interleaving leaves
//! an empty entry behind or drops a non-empty one.

use std::collections::HashSet;

use dashmap::DashMap;

use super::value_object::{ConnectionId, DisplayName};

/// Result of removing a connection from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// The name the connection was registered under
    pub name: DisplayName,
    /// Whether this was the last connection for that name
    pub became_empty: bool,
}

/// Thread-safe mapping from display name to its active connections.
///
/// Owned explicitly (wrap it in an `Arc` and hand it to the coordinator) rather
/// than living in a process-wide static.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    entries: DashMap<DisplayName, HashSet<ConnectionId>>,
    owners: DashMap<ConnectionId, DisplayName>,
}

impl PresenceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `connection_id` under `name`.
    ///
    /// Joining the same pair twice is a no-op. A connection registered under a
    /// different name is a caller bug: it is logged, moved so an id never appears
    /// under two names, and the departure from the old name is returned so the
    /// caller can announce it.
    pub fn join(&self, name: DisplayName, connection_id: ConnectionId) -> Option<Departure> {
        let moved = match self.owners.insert(connection_id.clone(), name.clone()) {
            Some(previous) if previous != name => {
                tracing::error!(
                    "Connection '{}' re-joined as '{}' while registered as '{}', moving it",
                    connection_id,
                    name,
                    previous
                );
                let became_empty = self.detach(&previous, &connection_id);
                Some(Departure {
                    name: previous,
                    became_empty,
                })
            }
            _ => None,
        };

        self.entries
            .entry(name)
            .or_default()
            .insert(connection_id);
        moved
    }

    /// Remove `connection_id` from whichever name holds it.
    ///
    /// Returns `None` when the connection never joined; that is a normal case
    /// (a socket that closes before announcing a name), not an error.
    pub fn leave(&self, connection_id: &ConnectionId) -> Option<Departure> {
        let (_, name) = self.owners.remove(connection_id)?;
        let became_empty = self.detach(&name, connection_id);
        Some(Departure { name, became_empty })
    }

    /// Sorted (code-point order), distinct display names currently present.
    pub fn roster(&self) -> Vec<DisplayName> {
        let mut names: Vec<DisplayName> = self
            .entries
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Whether at least one connection is registered under `name`.
    #[cfg(test)]
    pub(crate) fn contains(&self, name: &DisplayName) -> bool {
        self.entries.contains_key(name)
    }

    /// The name `connection_id` is registered under, if any.
    #[cfg(test)]
    pub(crate) fn name_of(&self, connection_id: &ConnectionId) -> Option<DisplayName> {
        self.owners
            .get(connection_id)
            .map(|owner| owner.value().clone())
    }

    /// Number of connections registered under `name`.
    #[cfg(test)]
    pub(crate) fn connection_count(&self, name: &DisplayName) -> usize {
        self.entries
            .get(name)
            .map(|connections| connections.len())
            .unwrap_or(0)
    }

    /// Whether no connection is registered at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove `connection_id` from the entry of `name`, dropping the entry if it
    /// became empty. Returns whether the entry was dropped.
    fn detach(&self, name: &DisplayName, connection_id: &ConnectionId) -> bool {
        self.entries
            .remove_if_mut(name, |_, connections| {
                connections.remove(connection_id);
                connections.is_empty()
            })
            .is_some()
    }
}
