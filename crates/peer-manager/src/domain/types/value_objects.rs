//! Value Objects for the Peer Manager

use super::entities::PeerId;
use super::errors::PeerManagerError;
use crate::domain::messages::ApplicationMessage;

/// Default target for active + pending connections.
pub const DEFAULT_MAX_PEERS: usize = 8;

/// Default discovery tick interval.
pub const DEFAULT_DISCOVERY_INTERVAL_MS: u64 = 1000;

/// Default number of archive entries shared in `reject` and `peerlist`.
pub const DEFAULT_ARCHIVE_SLICE_SIZE: usize = 15;

/// Well-known seed every node starts with unless configured otherwise.
pub const DEFAULT_BOOTSTRAP_NODE: PeerId = PeerId(0);

/// Configuration for one peer manager instance.
///
/// # Notes
///
/// - `max_peers` bounds active and pending connections together. Once the
///   connection table reaches it, the discovery loop stops for good.
/// - `archive_slice_size` caps every peer list this node sends. Lists
///   received from others are merged whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerManagerConfig {
    /// Target number of connections (default: 8)
    pub max_peers: usize,
    /// Discovery tick interval in milliseconds (default: 1000)
    pub discovery_interval_ms: u64,
    /// Peer-list slice size (default: 15)
    pub archive_slice_size: usize,
    /// Seeds loaded into the archive at startup (default: `[PeerId(0)]`)
    pub bootstrap_nodes: Vec<PeerId>,
    /// Fixed seed for random peer selection; `None` draws from entropy
    pub rng_seed: Option<u64>,
}

impl Default for PeerManagerConfig {
    fn default() -> Self {
        Self {
            max_peers: DEFAULT_MAX_PEERS,
            discovery_interval_ms: DEFAULT_DISCOVERY_INTERVAL_MS,
            archive_slice_size: DEFAULT_ARCHIVE_SLICE_SIZE,
            bootstrap_nodes: vec![DEFAULT_BOOTSTRAP_NODE],
            rng_seed: None,
        }
    }
}

impl PeerManagerConfig {
    /// Create a config suitable for testing (no seeds, deterministic rng)
    pub fn for_testing() -> Self {
        Self {
            max_peers: 3,
            discovery_interval_ms: 10,
            archive_slice_size: 15,
            bootstrap_nodes: Vec::new(),
            rng_seed: Some(7),
        }
    }

    /// Set the connection target.
    #[must_use]
    pub fn with_max_peers(mut self, max_peers: usize) -> Self {
        self.max_peers = max_peers;
        self
    }

    /// Replace the bootstrap seeds.
    #[must_use]
    pub fn with_bootstrap_nodes(mut self, nodes: Vec<PeerId>) -> Self {
        self.bootstrap_nodes = nodes;
        self
    }

    /// Fix the rng seed.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Reject values the state machine cannot run with.
    pub fn validate(&self) -> Result<(), PeerManagerError> {
        if self.max_peers == 0 {
            return Err(PeerManagerError::InvalidConfig(
                "max_peers must be at least 1".to_string(),
            ));
        }
        if self.discovery_interval_ms == 0 {
            return Err(PeerManagerError::InvalidConfig(
                "discovery_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.archive_slice_size == 0 {
            return Err(PeerManagerError::InvalidConfig(
                "archive_slice_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What the host should do with the discovery timer after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep ticking.
    Continue,
    /// Quota reached; cancel the timer.
    Stop,
}

/// Snapshot of the manager's state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeerManagerStats {
    /// Connections that completed the handshake.
    pub active: usize,
    /// Connections awaiting accept/reject.
    pub pending: usize,
    /// Known peers not in the connection table.
    pub archived: usize,
    /// Configured connection target.
    pub max_peers: usize,
    /// True once the discovery loop has gone inert.
    pub discovery_stopped: bool,
}

impl PeerManagerStats {
    /// Active plus pending connections.
    pub fn num_peers(&self) -> usize {
        self.active + self.pending
    }
}

/// Notification the peer manager sends to the layer above it.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamEvent {
    /// Handshake completed.
    Connected(PeerId),
    /// An active connection ended.
    Disconnected(PeerId),
    /// Application message from a connected peer.
    Application {
        /// Sender
        from: PeerId,
        /// Payload
        message: ApplicationMessage,
    },
}
