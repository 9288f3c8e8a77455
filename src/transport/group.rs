//! Bulk-shutdown coordination for many connections.
//!
//! A host that owns many live connections (a relay, a fan-out service, a
//! process about to exit) registers them in a [`ConnectionGroup`] and tears
//! all of them down with one [`shutdown_all`](ConnectionGroup::shutdown_all)
//! call.
//!
//! The group stores plain [`Connection`] handles; dropping the group does not
//! close anything, and a connection that closes on its own simply becomes a
//! stale entry until [`prune_closed`](ConnectionGroup::prune_closed) removes
//! it.

// ============================================================================
// Imports
// ============================================================================

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::identifiers::ConnectionId;

use super::Connection;

// ============================================================================
// ConnectionGroup
// ============================================================================

/// Registry of live connections keyed by [`ConnectionId`].
///
/// Thread-safe; shared by reference or inside an `Arc` across tasks.
///
/// # Example
///
/// ```ignore
/// let group = ConnectionGroup::new();
/// group.insert(session.connection());
///
/// // On host shutdown:
/// group.shutdown_all("server stopping");
/// ```
#[derive(Debug, Default)]
pub struct ConnectionGroup {
    /// Registered connections by ID.
    connections: RwLock<FxHashMap<ConnectionId, Connection>>,
}

impl ConnectionGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection and returns its ID.
    ///
    /// Re-inserting a connection with the same ID replaces the old entry.
    pub fn insert(&self, connection: Connection) -> ConnectionId {
        let id = connection.id();
        self.connections.write().insert(id, connection);
        debug!(id = %id, "Connection registered");
        id
    }

    /// Removes a connection from the group without closing it.
    pub fn remove(&self, id: ConnectionId) -> Option<Connection> {
        let removed = self.connections.write().remove(&id);
        if removed.is_some() {
            debug!(id = %id, "Connection unregistered");
        }
        removed
    }

    /// Returns a handle to a registered connection.
    #[must_use]
    pub fn get(&self, id: ConnectionId) -> Option<Connection> {
        self.connections.read().get(&id).cloned()
    }

    /// Returns the number of registered connections.
    #[inline]
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.read().len()
    }

    /// Returns `true` if no connections are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.read().is_empty()
    }

    /// Drops entries whose connection has closed.
    ///
    /// Returns the number of entries removed.
    pub fn prune_closed(&self) -> usize {
        let mut connections = self.connections.write();
        let before = connections.len();
        connections.retain(|_, connection| connection.is_open());
        let pruned = before - connections.len();

        if pruned > 0 {
            debug!(pruned, "Pruned closed connections");
        }
        pruned
    }

    /// Gracefully closes every registered connection and clears the group.
    ///
    /// Each connection receives a going-away close with the given reason.
    /// Already-closed connections are skipped silently.
    pub fn shutdown_all(&self, reason: &str) {
        let connections: Vec<Connection> = {
            let mut guard = self.connections.write();
            guard.drain().map(|(_, connection)| connection).collect()
        };

        let count = connections.len();
        for connection in &connections {
            connection.graceful_shutdown(reason);
        }

        if count > 0 {
            info!(count, reason, "Connection group shut down");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::sync::mpsc::UnboundedReceiver;

    use crate::transport::connection::Command;

    fn dangling() -> (Connection, UnboundedReceiver<Command>) {
        Connection::channel(ConnectionId::next())
    }

    #[test]
    fn test_insert_get_remove() {
        let group = ConnectionGroup::new();
        let (connection, _rx) = dangling();
        let id = group.insert(connection);

        assert_eq!(group.connection_count(), 1);
        assert!(group.get(id).is_some());

        let removed = group.remove(id).expect("present");
        assert_eq!(removed.id(), id);
        assert!(group.is_empty());
        assert!(group.get(id).is_none());
        assert!(group.remove(id).is_none());

        // Removal does not close.
        assert!(removed.is_open());
    }

    #[test]
    fn test_shutdown_all_closes_and_clears() {
        let group = ConnectionGroup::new();
        let (a, _rx_a) = dangling();
        let (b, _rx_b) = dangling();
        group.insert(a.clone());
        group.insert(b.clone());

        group.shutdown_all("server stopping");

        assert!(group.is_empty());
        assert!(!a.is_open());
        assert!(!b.is_open());

        // Idempotent on an empty group.
        group.shutdown_all("again");
    }

    #[test]
    fn test_prune_closed() {
        let group = ConnectionGroup::new();
        let (open, _rx_open) = dangling();
        let (closed, _rx_closed) = dangling();
        closed.mark_closed();

        group.insert(open);
        let closed_id = group.insert(closed);

        assert_eq!(group.prune_closed(), 1);
        assert_eq!(group.connection_count(), 1);
        assert!(group.get(closed_id).is_none());
        assert_eq!(group.prune_closed(), 0);
    }
}
