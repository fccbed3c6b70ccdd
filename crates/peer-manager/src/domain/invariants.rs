//! # Domain Invariants
//!
//! Rules that hold between any two handler invocations. They may be broken
//! mid-handler, never at its boundary.

use std::collections::HashSet;

use thiserror::Error;

use super::archive::NodeArchive;
use super::connection_table::ConnectionTable;
use super::types::PeerId;

/// A broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Peer present in both the connection table and the archive.
    #[error("{0} is both connected and archived")]
    Partition(PeerId),

    /// Tracked connection count drifted from the table size.
    #[error("Tracked {tracked} peers but table holds {actual}")]
    CountMismatch {
        /// Counter value
        tracked: usize,
        /// Table size
        actual: usize,
    },

    /// Archive holds the same peer twice.
    #[error("{0} is archived more than once")]
    DuplicateArchiveEntry(PeerId),
}

/// Invariant: a peer is in exactly one of {connection table, archive}.
pub fn invariant_partition(
    table: &ConnectionTable,
    archive: &NodeArchive,
) -> Result<(), InvariantViolation> {
    match archive.iter().find(|r| table.contains(&r.id)) {
        Some(record) => Err(InvariantViolation::Partition(record.id)),
        None => Ok(()),
    }
}

/// Invariant: the connection counter equals the table size.
pub fn invariant_count_consistency(
    num_peers: usize,
    table: &ConnectionTable,
) -> Result<(), InvariantViolation> {
    if num_peers != table.len() {
        return Err(InvariantViolation::CountMismatch {
            tracked: num_peers,
            actual: table.len(),
        });
    }
    Ok(())
}

/// Invariant: archive ids are unique.
pub fn invariant_archive_unique(archive: &NodeArchive) -> Result<(), InvariantViolation> {
    let mut seen = HashSet::with_capacity(archive.len());
    for record in archive.iter() {
        if !seen.insert(record.id) {
            return Err(InvariantViolation::DuplicateArchiveEntry(record.id));
        }
    }
    Ok(())
}
