//! Connection table implementation.

use std::collections::BTreeMap;

use crate::domain::{PeerId, PeerRecord, Timestamp};

/// Pending and active connections, keyed by peer id.
///
/// Ordered by id so broadcasts and random selection are reproducible under
/// a seeded rng.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTable {
    peers: BTreeMap<PeerId, PeerRecord>,
}

impl ConnectionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record unless the id is already present.
    ///
    /// Returns true if inserted.
    pub fn insert(&mut self, record: PeerRecord) -> bool {
        if self.peers.contains_key(&record.id) {
            return false;
        }
        self.peers.insert(record.id, record);
        true
    }

    /// Remove a connection.
    pub fn remove(&mut self, id: &PeerId) -> Option<PeerRecord> {
        self.peers.remove(id)
    }

    /// Check whether a peer is pending or active.
    pub fn contains(&self, id: &PeerId) -> bool {
        self.peers.contains_key(id)
    }

    /// Look up a connection.
    pub fn get(&self, id: &PeerId) -> Option<&PeerRecord> {
        self.peers.get(id)
    }

    /// Mark a connection active and stamp it.
    ///
    /// Returns false if the peer is not in the table.
    pub fn activate(&mut self, id: &PeerId, now: Timestamp) -> bool {
        match self.peers.get_mut(id) {
            Some(record) => {
                record.active = true;
                record.last_message = now;
                true
            }
            None => false,
        }
    }

    /// Refresh the last-message time of a connection.
    pub fn touch(&mut self, id: &PeerId, now: Timestamp) -> bool {
        match self.peers.get_mut(id) {
            Some(record) => {
                record.last_message = now;
                true
            }
            None => false,
        }
    }

    /// Total connections (pending + active).
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// True if there are no connections.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Number of active connections.
    pub fn active_count(&self) -> usize {
        self.peers.values().filter(|r| r.active).count()
    }

    /// Number of pending connections.
    pub fn pending_count(&self) -> usize {
        self.len() - self.active_count()
    }

    /// Ids of active connections, in id order.
    pub fn active_ids(&self) -> Vec<PeerId> {
        self.peers
            .values()
            .filter(|r| r.active)
            .map(|r| r.id)
            .collect()
    }

    /// Iterate all connections in id order.
    pub fn iter(&self) -> impl Iterator<Item = &PeerRecord> {
        self.peers.values()
    }
}
