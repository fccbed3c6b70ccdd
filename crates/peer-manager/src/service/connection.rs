//! Connection lifecycle: connect, disconnect and handshake bookkeeping.

use tracing::{debug, info};

use super::core::PeerManager;
use crate::domain::{Disposition, IgnoreReason, PeerId, PeerRecord, ProtocolMessage};

impl PeerManager {
    /// Open a connection to `peer`.
    ///
    /// No-op for ourselves and for peers already pending or active. The
    /// archived record is reused when there is one, otherwise a fresh record
    /// is created. The connection stays pending until the peer accepts or
    /// rejects; there is no timeout.
    pub fn connect(&mut self, peer: PeerId) -> Disposition {
        let record = self
            .archive
            .get(&peer)
            .cloned()
            .unwrap_or_else(|| PeerRecord::new(peer, self.now()));
        self.connect_record(record)
    }

    pub(crate) fn connect_record(&mut self, mut record: PeerRecord) -> Disposition {
        let peer = record.id;

        if peer == self.local_id {
            return Disposition::Ignored(IgnoreReason::SelfConnection);
        }

        if self.peers.contains(&peer) {
            debug!(node = %self.local_id, %peer, "[peermgr] Connect skipped, already in table");
            return Disposition::Ignored(IgnoreReason::AlreadyConnected);
        }

        self.archive.remove(&peer);
        record.active = false;
        self.peers.insert(record);
        self.num_peers += 1;

        debug!(node = %self.local_id, %peer, "[peermgr] Connecting");
        self.send(peer, ProtocolMessage::Connect);
        Disposition::Handled
    }

    /// Forget a connection locally.
    ///
    /// The record goes to the back of the archive so the discovery loop can
    /// retry it later. Idempotent.
    pub fn disconnect(&mut self, peer: PeerId) -> Disposition {
        let Some(mut record) = self.peers.remove(&peer) else {
            return Disposition::Ignored(IgnoreReason::UnknownPeer);
        };
        self.num_peers -= 1;

        let was_active = record.active;
        record.active = false;
        self.archive.push_back(record);

        if was_active {
            info!(node = %self.local_id, %peer, "[peermgr] Peer disconnected");
            self.upstream.on_peer_disconnected(peer);
        } else {
            debug!(node = %self.local_id, %peer, "[peermgr] Pending connection dropped");
        }
        Disposition::Handled
    }

    /// Tell `peer` we are leaving, then disconnect locally.
    pub fn drop_connection(&mut self, peer: PeerId) -> Disposition {
        if !self.peers.contains(&peer) {
            return Disposition::Ignored(IgnoreReason::UnknownPeer);
        }
        self.send(peer, ProtocolMessage::Disconnect);
        self.disconnect(peer)
    }

    /// Bookkeeping shared by an inbound `accept` and by accepting an inbound
    /// `connect`: drop the archive entry, mark active, notify upstream.
    ///
    /// The peer must already be in the connection table.
    pub(crate) fn complete_handshake(&mut self, peer: PeerId) {
        let now = self.now();
        self.archive.remove(&peer);
        self.peers.activate(&peer, now);

        info!(
            node = %self.local_id,
            %peer,
            peers = self.num_peers,
            "[peermgr] Connection established"
        );
        self.upstream.on_peer_connected(peer);
    }
}
