//! Core Domain Entities for the Peer Manager

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a node in the network.
///
/// Equality is pure identity comparison. The transport decides how an id
/// maps to an address; the peer manager never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(pub u64);

impl PeerId {
    /// Create a PeerId from its raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer#{}", self.0)
    }
}

impl From<u64> for PeerId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Host-supplied timestamp in milliseconds.
///
/// Monotonic non-decreasing as far as the peer manager is concerned; the
/// host decides whether it is wall-clock or logical time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Get the underlying milliseconds value.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Add milliseconds (saturating).
    pub fn add_millis(&self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    /// Milliseconds elapsed since `earlier` (zero if `earlier` is later).
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// A known remote node, connected or not.
///
/// Records live either in the connection table or in the node archive,
/// never both. They move between the two but are never destroyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRecord {
    /// Identity of the remote node.
    pub id: PeerId,
    /// Time of the most recent message received from this peer.
    pub last_message: Timestamp,
    /// True once the connect/accept handshake has completed on this side.
    pub active: bool,
}

impl PeerRecord {
    /// Create an inactive record.
    pub fn new(id: PeerId, last_message: Timestamp) -> Self {
        Self {
            id,
            last_message,
            active: false,
        }
    }

    /// Wire form of this record, as shared in peer lists.
    pub fn to_candidate(&self) -> PeerCandidate {
        PeerCandidate {
            id: self.id,
            last_seen: self.last_message,
        }
    }
}

/// Peer-list entry exchanged in `reject` and `peerlist` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerCandidate {
    /// Identity of the advertised node.
    pub id: PeerId,
    /// When the advertising node last heard of it.
    #[serde(rename = "lastSeenTimestamp", default)]
    pub last_seen: Timestamp,
}

impl PeerCandidate {
    /// Create a candidate.
    pub fn new(id: PeerId, last_seen: Timestamp) -> Self {
        Self { id, last_seen }
    }
}
