//! Periodic discovery loop.

use rand::Rng;
use tracing::{debug, info};

use super::core::PeerManager;
use crate::domain::{PeerId, ProtocolMessage, TickOutcome};
use crate::ports::TimerHandle;

impl PeerManager {
    /// Run one discovery tick.
    ///
    /// 1. At quota: stop for good, no side effects.
    /// 2. Rotate the archive front to the back and connect to it.
    /// 3. Ask one random active peer for more candidates.
    ///
    /// Steps 2 and 3 can both happen in the same tick.
    pub fn discovery_tick(&mut self) -> TickOutcome {
        if self.discovery_stopped {
            return TickOutcome::Stop;
        }

        if self.num_peers >= self.config.max_peers {
            self.discovery_stopped = true;
            info!(
                node = %self.local_id,
                peers = self.num_peers,
                "[peermgr] Connection quota reached, discovery stopped"
            );
            return TickOutcome::Stop;
        }

        if let Some(candidate) = self.archive.rotate() {
            self.connect_record(candidate);
        }

        if self.num_peers > 0 {
            match self.random_active_peer() {
                Some(target) => self.send(target, ProtocolMessage::GetPeers),
                None => debug!(node = %self.local_id, "[peermgr] No active peer to ask for peers"),
            }
        }

        TickOutcome::Continue
    }

    /// Timer callback: tick unless cancelled, cancel on [`TickOutcome::Stop`].
    pub fn on_discovery_timer(&mut self, timer: &dyn TimerHandle) -> TickOutcome {
        if timer.is_cancelled() {
            return TickOutcome::Stop;
        }
        let outcome = self.discovery_tick();
        if outcome == TickOutcome::Stop {
            timer.cancel();
        }
        outcome
    }

    /// Uniformly random active connection; pending ones are never picked.
    fn random_active_peer(&mut self) -> Option<PeerId> {
        let active = self.peers.active_ids();
        if active.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..active.len());
        Some(active[index])
    }
}
