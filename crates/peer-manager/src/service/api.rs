use serde_json::Value;

use super::core::PeerManager;
use crate::domain::{Disposition, PeerId, PeerManagerStats, ProtocolMessage, TickOutcome};
use crate::ports::PeerManagerApi;

impl PeerManagerApi for PeerManager {
    fn discovery_tick(&mut self) -> TickOutcome {
        PeerManager::discovery_tick(self)
    }

    fn handle_message(&mut self, from: PeerId, message: ProtocolMessage) -> Disposition {
        PeerManager::handle_message(self, from, message)
    }

    fn connect(&mut self, peer: PeerId) -> Disposition {
        PeerManager::connect(self, peer)
    }

    fn disconnect(&mut self, peer: PeerId) -> Disposition {
        PeerManager::disconnect(self, peer)
    }

    fn drop_connection(&mut self, peer: PeerId) -> Disposition {
        PeerManager::drop_connection(self, peer)
    }

    fn broadcast(&self, name: &str, obj: Value) -> usize {
        PeerManager::broadcast(self, name, obj)
    }

    fn stats(&self) -> PeerManagerStats {
        PeerManager::stats(self)
    }
}
