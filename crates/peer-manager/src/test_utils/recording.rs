use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{
    ApplicationMessage, MessageKind, PeerId, ProtocolMessage, TransportError, UpstreamEvent,
};
use crate::ports::{MessageSink, UpstreamHandler};

/// Message sink that stores every send for later inspection.
///
/// Clones share storage. Targets marked unreachable fail with
/// [`TransportError::UnknownPeer`] and are not recorded.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    sent: Arc<Mutex<Vec<(PeerId, ProtocolMessage)>>>,
    unreachable: Arc<Mutex<HashSet<PeerId>>>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded sends, oldest first.
    pub fn sent(&self) -> Vec<(PeerId, ProtocolMessage)> {
        self.sent.lock().clone()
    }

    /// Drain recorded sends.
    pub fn take(&self) -> Vec<(PeerId, ProtocolMessage)> {
        std::mem::take(&mut *self.sent.lock())
    }

    /// Messages sent to one peer.
    pub fn sent_to(&self, peer: PeerId) -> Vec<ProtocolMessage> {
        self.sent
            .lock()
            .iter()
            .filter(|(target, _)| *target == peer)
            .map(|(_, message)| message.clone())
            .collect()
    }

    /// Targets of every message of one kind, oldest first.
    pub fn targets_of(&self, kind: MessageKind) -> Vec<PeerId> {
        self.sent
            .lock()
            .iter()
            .filter(|(_, message)| message.kind() == kind)
            .map(|(target, _)| *target)
            .collect()
    }

    /// Make sends to `peer` fail.
    pub fn set_unreachable(&self, peer: PeerId) {
        self.unreachable.lock().insert(peer);
    }
}

impl MessageSink for RecordingSink {
    fn send(&self, target: PeerId, message: ProtocolMessage) -> Result<(), TransportError> {
        if self.unreachable.lock().contains(&target) {
            return Err(TransportError::UnknownPeer(target));
        }
        self.sent.lock().push((target, message));
        Ok(())
    }
}

/// Upstream handler that stores every notification.
#[derive(Debug, Clone, Default)]
pub struct RecordingUpstream {
    events: Arc<Mutex<Vec<UpstreamEvent>>>,
}

impl RecordingUpstream {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications, oldest first.
    pub fn events(&self) -> Vec<UpstreamEvent> {
        self.events.lock().clone()
    }

    /// Peers reported as connected, oldest first.
    pub fn connected(&self) -> Vec<PeerId> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                UpstreamEvent::Connected(peer) => Some(*peer),
                _ => None,
            })
            .collect()
    }

    /// Application messages forwarded upstream.
    pub fn application_messages(&self) -> Vec<(PeerId, ApplicationMessage)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                UpstreamEvent::Application { from, message } => Some((*from, message.clone())),
                _ => None,
            })
            .collect()
    }
}

impl UpstreamHandler for RecordingUpstream {
    fn on_peer_connected(&self, peer: PeerId) {
        self.events.lock().push(UpstreamEvent::Connected(peer));
    }

    fn on_application_message(&self, from: PeerId, message: ApplicationMessage) {
        self.events
            .lock()
            .push(UpstreamEvent::Application { from, message });
    }

    fn on_peer_disconnected(&self, peer: PeerId) {
        self.events.lock().push(UpstreamEvent::Disconnected(peer));
    }
}
