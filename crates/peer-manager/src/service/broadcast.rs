use serde_json::Value;

use super::core::PeerManager;
use crate::domain::{ApplicationMessage, ProtocolMessage};

impl PeerManager {
    /// Send an application message to every active peer.
    ///
    /// Pending peers have not finished the handshake and get nothing.
    /// Returns the number of peers addressed.
    pub fn broadcast(&self, name: &str, obj: Value) -> usize {
        let targets = self.peers.active_ids();
        for target in &targets {
            let message = ApplicationMessage::new(name, obj.clone());
            self.send(*target, ProtocolMessage::Application(message));
        }
        targets.len()
    }
}
