//! Node archive implementation.

use std::collections::VecDeque;

use crate::domain::{PeerCandidate, PeerId, PeerRecord};

/// Ordered pool of known peers that are not in the connection table.
///
/// The front holds the most recently learned candidates; the discovery loop
/// takes from the front and rotates to the back, so every entry is retried
/// before any is retried twice.
///
/// # Invariant
///
/// No id appears more than once: every insertion first removes an existing
/// record with the same id.
#[derive(Debug, Clone, Default)]
pub struct NodeArchive {
    entries: VecDeque<PeerRecord>,
}

impl NodeArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of archived peers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no peers are archived.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether a peer is archived.
    pub fn contains(&self, id: &PeerId) -> bool {
        self.entries.iter().any(|r| r.id == *id)
    }

    /// Look up an archived record.
    pub fn get(&self, id: &PeerId) -> Option<&PeerRecord> {
        self.entries.iter().find(|r| r.id == *id)
    }

    /// Iterate front to back.
    pub fn iter(&self) -> impl Iterator<Item = &PeerRecord> {
        self.entries.iter()
    }

    /// Archived ids, front to back.
    pub fn ids(&self) -> Vec<PeerId> {
        self.entries.iter().map(|r| r.id).collect()
    }

    /// Insert at the front, replacing any record with the same id.
    pub fn push_front(&mut self, record: PeerRecord) {
        self.remove(&record.id);
        self.entries.push_front(record);
    }

    /// Insert at the back, replacing any record with the same id.
    pub fn push_back(&mut self, record: PeerRecord) {
        self.remove(&record.id);
        self.entries.push_back(record);
    }

    /// Remove every record with this id, returning the first one found.
    pub fn remove(&mut self, id: &PeerId) -> Option<PeerRecord> {
        let pos = self.entries.iter().position(|r| r.id == *id)?;
        let removed = self.entries.remove(pos);
        self.entries.retain(|r| r.id != *id);
        removed
    }

    /// Move the front record to the back and return a copy of it.
    pub fn rotate(&mut self) -> Option<PeerRecord> {
        let front = self.entries.pop_front()?;
        self.entries.push_back(front.clone());
        Some(front)
    }

    /// Wire form of the first `limit` records.
    pub fn slice(&self, limit: usize) -> Vec<PeerCandidate> {
        self.entries
            .iter()
            .take(limit)
            .map(PeerRecord::to_candidate)
            .collect()
    }
}
