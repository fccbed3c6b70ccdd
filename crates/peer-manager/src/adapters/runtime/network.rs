use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::trace;

use crate::domain::{
    ApplicationMessage, Envelope, PeerId, ProtocolMessage, TransportError, UpstreamEvent,
};
use crate::ports::{MessageSink, UpstreamHandler};

type Routes = Arc<RwLock<HashMap<PeerId, mpsc::UnboundedSender<Envelope>>>>;

/// Process-local message substrate: one unbounded inbox per registered node.
///
/// Delivery is FIFO per sender/receiver pair. Sends to nodes that never
/// registered, or that went away, fail with a [`TransportError`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryNetwork {
    routes: Routes,
}

impl InMemoryNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node, replacing any previous inbox for the same id.
    ///
    /// Returns the node's outbound sink and its inbox.
    pub fn register(&self, id: PeerId) -> (NetworkSender, mpsc::UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.routes.write().insert(id, tx);
        let sender = NetworkSender {
            local_id: id,
            routes: Arc::clone(&self.routes),
        };
        (sender, rx)
    }

    /// Remove a node's inbox.
    pub fn unregister(&self, id: PeerId) -> bool {
        self.routes.write().remove(&id).is_some()
    }

    /// Registered node ids.
    pub fn node_ids(&self) -> Vec<PeerId> {
        let mut ids: Vec<PeerId> = self.routes.read().keys().copied().collect();
        ids.sort();
        ids
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    /// True when no node is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }
}

/// Outbound half of a registered node.
#[derive(Debug, Clone)]
pub struct NetworkSender {
    local_id: PeerId,
    routes: Routes,
}

impl MessageSink for NetworkSender {
    fn send(&self, target: PeerId, message: ProtocolMessage) -> Result<(), TransportError> {
        let routes = self.routes.read();
        let inbox = routes
            .get(&target)
            .ok_or(TransportError::UnknownPeer(target))?;
        inbox
            .send(Envelope::new(self.local_id, target, message))
            .map_err(|_| TransportError::ChannelClosed(target))
    }
}

/// Upstream handler that forwards notifications over a channel.
#[derive(Debug, Clone)]
pub struct ChannelUpstream {
    tx: mpsc::UnboundedSender<UpstreamEvent>,
}

impl ChannelUpstream {
    /// Create the handler and the receiving end for the application.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UpstreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: UpstreamEvent) {
        if self.tx.send(event).is_err() {
            trace!("[peermgr] Upstream receiver dropped, event discarded");
        }
    }
}

impl UpstreamHandler for ChannelUpstream {
    fn on_peer_connected(&self, peer: PeerId) {
        self.emit(UpstreamEvent::Connected(peer));
    }

    fn on_application_message(&self, from: PeerId, message: ApplicationMessage) {
        self.emit(UpstreamEvent::Application { from, message });
    }

    fn on_peer_disconnected(&self, peer: PeerId) {
        self.emit(UpstreamEvent::Disconnected(peer));
    }
}
