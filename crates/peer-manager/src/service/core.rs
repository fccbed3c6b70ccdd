use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::domain::{
    invariant_archive_unique, invariant_count_consistency, invariant_partition, ConnectionTable,
    InvariantViolation, NodeArchive, PeerId, PeerManagerConfig, PeerManagerError,
    PeerManagerStats, PeerRecord, ProtocolMessage, Timestamp,
};
use crate::ports::{MessageSink, TimeSource, UpstreamHandler};

/// Per-node peer manager.
///
/// Owns the connection table and the node archive, and is the only thing
/// that mutates them. The host serializes every call (timer ticks and
/// inbound messages), so there is no internal locking.
///
/// # Example
///
/// ```rust,ignore
/// use peer_manager::{PeerId, PeerManager, PeerManagerConfig};
///
/// let mut manager = PeerManager::new(
///     PeerId::new(42),
///     PeerManagerConfig::default(),
///     Box::new(sink),
///     Box::new(upstream),
///     Box::new(SystemTimeSource::new()),
/// )?;
///
/// // Host timer callback
/// manager.discovery_tick();
/// ```
pub struct PeerManager {
    /// Our own id
    pub(crate) local_id: PeerId,
    /// Static configuration
    pub(crate) config: PeerManagerConfig,
    /// Pending and active connections
    pub(crate) peers: ConnectionTable,
    /// Tracked size of `peers`
    pub(crate) num_peers: usize,
    /// Known peers not in `peers`
    pub(crate) archive: NodeArchive,
    /// Set once the quota is reached; never cleared
    pub(crate) discovery_stopped: bool,
    /// Random active-peer selection
    pub(crate) rng: StdRng,
    pub(crate) sink: Box<dyn MessageSink>,
    pub(crate) upstream: Box<dyn UpstreamHandler>,
    pub(crate) time_source: Box<dyn TimeSource>,
}

impl PeerManager {
    /// Create a peer manager and seed its archive with the bootstrap nodes.
    ///
    /// # Errors
    ///
    /// Returns [`PeerManagerError::InvalidConfig`] if the config fails
    /// validation.
    pub fn new(
        local_id: PeerId,
        config: PeerManagerConfig,
        sink: Box<dyn MessageSink>,
        upstream: Box<dyn UpstreamHandler>,
        time_source: Box<dyn TimeSource>,
    ) -> Result<Self, PeerManagerError> {
        config.validate()?;

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let now = time_source.now();
        let mut archive = NodeArchive::new();
        for seed in config.bootstrap_nodes.iter().filter(|id| **id != local_id) {
            archive.push_back(PeerRecord::new(*seed, now));
        }

        debug!(
            node = %local_id,
            seeds = archive.len(),
            max_peers = config.max_peers,
            "[peermgr] Peer manager created"
        );

        Ok(Self {
            local_id,
            config,
            peers: ConnectionTable::new(),
            num_peers: 0,
            archive,
            discovery_stopped: false,
            rng,
            sink,
            upstream,
            time_source,
        })
    }

    /// Get the current timestamp from the time source.
    pub(crate) fn now(&self) -> Timestamp {
        self.time_source.now()
    }

    /// Fire-and-forget send; failures are logged only.
    pub(crate) fn send(&self, target: PeerId, message: ProtocolMessage) {
        let kind = message.kind();
        match self.sink.send(target, message) {
            Ok(()) => debug!(node = %self.local_id, peer = %target, %kind, "[peermgr] Sent"),
            Err(e) => warn!(
                node = %self.local_id,
                peer = %target,
                %kind,
                error = %e,
                "[peermgr] Send failed"
            ),
        }
    }

    /// Our own id.
    pub fn local_id(&self) -> PeerId {
        self.local_id
    }

    /// Configuration in use.
    pub fn config(&self) -> &PeerManagerConfig {
        &self.config
    }

    /// Pending plus active connections.
    pub fn num_peers(&self) -> usize {
        self.num_peers
    }

    /// Connection record for a peer, if pending or active.
    pub fn peer(&self, id: &PeerId) -> Option<&PeerRecord> {
        self.peers.get(id)
    }

    /// True if the peer completed the handshake.
    pub fn is_active(&self, id: &PeerId) -> bool {
        self.peers.get(id).is_some_and(|r| r.active)
    }

    /// Active peer ids, in id order.
    pub fn active_peers(&self) -> Vec<PeerId> {
        self.peers.active_ids()
    }

    /// The connection table.
    pub fn connections(&self) -> &ConnectionTable {
        &self.peers
    }

    /// The node archive.
    pub fn archive(&self) -> &NodeArchive {
        &self.archive
    }

    /// Archived ids, front to back.
    pub fn archive_ids(&self) -> Vec<PeerId> {
        self.archive.ids()
    }

    /// True once the discovery loop went inert.
    pub fn discovery_stopped(&self) -> bool {
        self.discovery_stopped
    }

    /// Current state snapshot.
    pub fn stats(&self) -> PeerManagerStats {
        PeerManagerStats {
            active: self.peers.active_count(),
            pending: self.peers.pending_count(),
            archived: self.archive.len(),
            max_peers: self.config.max_peers,
            discovery_stopped: self.discovery_stopped,
        }
    }

    /// Check the partition, count and uniqueness invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        invariant_partition(&self.peers, &self.archive)?;
        invariant_count_consistency(self.num_peers, &self.peers)?;
        invariant_archive_unique(&self.archive)
    }
}

impl std::fmt::Debug for PeerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerManager")
            .field("local_id", &self.local_id)
            .field("num_peers", &self.num_peers)
            .field("peers", &self.peers)
            .field("archive", &self.archive)
            .field("discovery_stopped", &self.discovery_stopped)
            .finish_non_exhaustive()
    }
}
