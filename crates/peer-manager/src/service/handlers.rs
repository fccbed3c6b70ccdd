//! Inbound protocol handlers.
//!
//! Every handler checks the sender's relationship state first and ignores
//! the message on mismatch. Duplicates, replays and messages from peers we
//! already forgot are expected, not errors.

use serde_json::Value;
use tracing::{debug, info};

use super::core::PeerManager;
use crate::domain::{
    ApplicationMessage, Disposition, IgnoreReason, PeerCandidate, PeerId, PeerManagerError,
    PeerRecord, ProtocolMessage,
};

impl PeerManager {
    /// Route one inbound message to its handler.
    pub fn handle_message(&mut self, from: PeerId, message: ProtocolMessage) -> Disposition {
        let kind = message.kind();
        let disposition = match message {
            ProtocolMessage::Connect => self.on_connect(from),
            ProtocolMessage::Accept => self.on_accept(from),
            ProtocolMessage::Reject(candidates) => self.on_reject(from, candidates),
            ProtocolMessage::Disconnect => self.on_disconnect(from),
            ProtocolMessage::PeerList(candidates) => self.on_peerlist(from, candidates),
            ProtocolMessage::GetPeers => self.on_getpeers(from),
            ProtocolMessage::Application(msg) => self.on_application(from, msg),
        };

        if let Disposition::Ignored(reason) = disposition {
            debug!(
                node = %self.local_id,
                peer = %from,
                %kind,
                %reason,
                "[peermgr] Ignored message"
            );
        }
        disposition
    }

    /// Decode a named JSON message and route it.
    ///
    /// # Errors
    ///
    /// Unknown names and malformed payloads are reported to the host; the
    /// state machine is left untouched.
    pub fn dispatch(
        &mut self,
        from: PeerId,
        name: &str,
        payload: Value,
    ) -> Result<Disposition, PeerManagerError> {
        let message = ProtocolMessage::from_parts(name, payload)?;
        Ok(self.handle_message(from, message))
    }

    /// Inbound connection request.
    ///
    /// Below quota the sender is accepted on the spot. At quota it is
    /// refused, parked at the front of the archive, and handed a slice of
    /// the archive to try instead.
    pub fn on_connect(&mut self, from: PeerId) -> Disposition {
        if from == self.local_id {
            return Disposition::Ignored(IgnoreReason::SelfConnection);
        }
        if self.peers.contains(&from) {
            return Disposition::Ignored(IgnoreReason::AlreadyConnected);
        }

        let now = self.now();

        if self.num_peers < self.config.max_peers {
            self.peers.insert(PeerRecord::new(from, now));
            self.num_peers += 1;
            self.complete_handshake(from);
            self.send(from, ProtocolMessage::Accept);
            return Disposition::Handled;
        }

        self.archive.push_front(PeerRecord::new(from, now));
        let alternatives = self.archive.slice(self.config.archive_slice_size);
        info!(
            node = %self.local_id,
            peer = %from,
            alternatives = alternatives.len(),
            "[peermgr] At capacity, rejecting connection"
        );
        self.send(from, ProtocolMessage::Reject(alternatives));
        Disposition::Handled
    }

    /// Our connection request was granted.
    ///
    /// A replayed `accept` for an already active peer only refreshes its
    /// last-message time.
    pub fn on_accept(&mut self, from: PeerId) -> Disposition {
        let Some(active) = self.peers.get(&from).map(|r| r.active) else {
            return Disposition::Ignored(IgnoreReason::UnknownPeer);
        };

        if active {
            let now = self.now();
            self.peers.touch(&from, now);
            return Disposition::Ignored(IgnoreReason::AlreadyConnected);
        }

        self.complete_handshake(from);
        Disposition::Handled
    }

    /// Our connection request was refused; keep the suggested alternatives.
    pub fn on_reject(&mut self, from: PeerId, candidates: Vec<PeerCandidate>) -> Disposition {
        if !self.peers.contains(&from) {
            return Disposition::Ignored(IgnoreReason::UnknownPeer);
        }
        self.merge_candidates(candidates);
        self.disconnect(from)
    }

    /// The remote side closed the connection.
    pub fn on_disconnect(&mut self, from: PeerId) -> Disposition {
        self.disconnect(from)
    }

    /// A connected peer shared candidates.
    pub fn on_peerlist(&mut self, from: PeerId, candidates: Vec<PeerCandidate>) -> Disposition {
        if !self.peers.contains(&from) {
            return Disposition::Ignored(IgnoreReason::UnknownPeer);
        }
        self.merge_candidates(candidates);
        Disposition::Handled
    }

    /// A connected peer asked for candidates.
    pub fn on_getpeers(&mut self, from: PeerId) -> Disposition {
        if !self.peers.contains(&from) {
            return Disposition::Ignored(IgnoreReason::UnknownPeer);
        }
        let candidates = self.archive.slice(self.config.archive_slice_size);
        self.send(from, ProtocolMessage::PeerList(candidates));
        Disposition::Handled
    }

    /// Application traffic from a connected peer, forwarded upstream.
    pub fn on_application(&mut self, from: PeerId, message: ApplicationMessage) -> Disposition {
        let now = self.now();
        if !self.peers.touch(&from, now) {
            return Disposition::Ignored(IgnoreReason::UnknownPeer);
        }
        self.upstream.on_application_message(from, message);
        Disposition::Handled
    }

    /// Put each candidate at the archive front, newest last-in first-out.
    ///
    /// Ourselves and peers already in the connection table are skipped.
    fn merge_candidates(&mut self, candidates: Vec<PeerCandidate>) {
        let now = self.now();
        let mut merged = 0usize;
        for candidate in candidates {
            if candidate.id == self.local_id || self.peers.contains(&candidate.id) {
                continue;
            }
            self.archive.push_front(PeerRecord::new(candidate.id, now));
            merged += 1;
        }
        debug!(
            node = %self.local_id,
            merged,
            archived = self.archive.len(),
            "[peermgr] Merged candidates"
        );
    }
}
