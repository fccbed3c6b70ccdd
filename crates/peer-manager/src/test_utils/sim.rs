//! Deterministic in-process network of peer managers.
//!
//! Every send lands in one shared FIFO queue. Tests decide when queued
//! envelopes are delivered, dropped, reordered or duplicated, and when
//! each node's discovery timer fires.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use super::clock::ManualClock;
use super::recording::RecordingUpstream;
use crate::domain::{
    Disposition, Envelope, InvariantViolation, PeerId, PeerManagerConfig, PeerManagerError,
    ProtocolMessage, TickOutcome, TransportError,
};
use crate::ports::MessageSink;
use crate::service::PeerManager;

type Queue = Arc<Mutex<VecDeque<Envelope>>>;

/// Sink that stamps the sender and appends to the shared queue.
#[derive(Debug, Clone)]
struct SimSink {
    local_id: PeerId,
    queue: Queue,
}

impl MessageSink for SimSink {
    fn send(&self, target: PeerId, message: ProtocolMessage) -> Result<(), TransportError> {
        self.queue
            .lock()
            .push_back(Envelope::new(self.local_id, target, message));
        Ok(())
    }
}

struct SimNode {
    manager: PeerManager,
    upstream: RecordingUpstream,
}

/// Synchronous multi-node harness.
///
/// # Example
///
/// ```rust,ignore
/// use peer_manager::test_utils::SimNetwork;
/// use peer_manager::{PeerId, PeerManagerConfig};
///
/// let mut net = SimNetwork::new();
/// let a = PeerId::new(1);
/// let b = PeerId::new(2);
/// net.add_node(a, PeerManagerConfig::for_testing()).unwrap();
/// net.add_node(b, PeerManagerConfig::for_testing()).unwrap();
///
/// net.node_mut(a).unwrap().connect(b);
/// net.deliver_all();
///
/// assert!(net.node(a).unwrap().is_active(&b));
/// assert!(net.node(b).unwrap().is_active(&a));
/// ```
pub struct SimNetwork {
    nodes: BTreeMap<PeerId, SimNode>,
    queue: Queue,
    clock: ManualClock,
    delivered: usize,
}

impl SimNetwork {
    /// Empty network with the clock at zero.
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            clock: ManualClock::new(0),
            delivered: 0,
        }
    }

    /// Add a node sharing the network clock.
    ///
    /// Replaces any existing node with the same id.
    pub fn add_node(
        &mut self,
        id: PeerId,
        config: PeerManagerConfig,
    ) -> Result<(), PeerManagerError> {
        let upstream = RecordingUpstream::new();
        let sink = SimSink {
            local_id: id,
            queue: Arc::clone(&self.queue),
        };
        let manager = PeerManager::new(
            id,
            config,
            Box::new(sink),
            Box::new(upstream.clone()),
            Box::new(self.clock.clone()),
        )?;
        self.nodes.insert(id, SimNode { manager, upstream });
        Ok(())
    }

    /// Remove a node; messages addressed to it are dropped on delivery.
    pub fn remove_node(&mut self, id: PeerId) -> Option<PeerManager> {
        self.nodes.remove(&id).map(|node| node.manager)
    }

    /// Node ids in order.
    pub fn node_ids(&self) -> Vec<PeerId> {
        self.nodes.keys().copied().collect()
    }

    pub fn node(&self, id: PeerId) -> Option<&PeerManager> {
        self.nodes.get(&id).map(|node| &node.manager)
    }

    pub fn node_mut(&mut self, id: PeerId) -> Option<&mut PeerManager> {
        self.nodes.get_mut(&id).map(|node| &mut node.manager)
    }

    /// Upstream notifications recorded for a node.
    pub fn upstream(&self, id: PeerId) -> Option<&RecordingUpstream> {
        self.nodes.get(&id).map(|node| &node.upstream)
    }

    /// Shared clock handle.
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Envelopes waiting for delivery.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Total envelopes delivered so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Deliver the oldest queued envelope.
    ///
    /// Returns `None` when the queue is empty, `Some(None)` when the target
    /// no longer exists.
    pub fn step(&mut self) -> Option<Option<Disposition>> {
        let envelope = self.queue.lock().pop_front()?;
        Some(self.deliver(envelope))
    }

    /// Deliver until the queue drains, including messages sent in response.
    ///
    /// Returns the number of envelopes delivered.
    pub fn deliver_all(&mut self) -> usize {
        let mut count = 0;
        while self.step().is_some() {
            count += 1;
        }
        count
    }

    /// Discard every queued envelope.
    pub fn drop_all(&mut self) -> usize {
        let mut queue = self.queue.lock();
        let dropped = queue.len();
        queue.clear();
        dropped
    }

    /// Remove and return every queued envelope.
    pub fn take_queue(&mut self) -> Vec<Envelope> {
        self.queue.lock().drain(..).collect()
    }

    /// Append an envelope to the back of the queue.
    pub fn inject(&mut self, envelope: Envelope) {
        self.queue.lock().push_back(envelope);
    }

    /// Deliver one envelope immediately, bypassing the queue.
    pub fn deliver(&mut self, envelope: Envelope) -> Option<Disposition> {
        let node = self.nodes.get_mut(&envelope.to)?;
        self.delivered += 1;
        Some(node.manager.handle_message(envelope.from, envelope.message))
    }

    /// Fire every node's discovery timer once, in id order.
    pub fn tick_all(&mut self) -> BTreeMap<PeerId, TickOutcome> {
        self.nodes
            .iter_mut()
            .map(|(id, node)| (*id, node.manager.discovery_tick()))
            .collect()
    }

    /// Tick every node, advance the clock, and drain the queue, `rounds` times.
    pub fn run_rounds(&mut self, rounds: usize, interval_ms: u64) {
        for _ in 0..rounds {
            self.tick_all();
            self.clock.advance(interval_ms);
            self.deliver_all();
        }
    }

    /// Check invariants on every node.
    pub fn check_invariants_all(&self) -> Result<(), (PeerId, InvariantViolation)> {
        for (id, node) in &self.nodes {
            node.manager.check_invariants().map_err(|e| (*id, e))?;
        }
        Ok(())
    }
}

impl Default for SimNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SimNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimNetwork")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("pending", &self.pending())
            .field("delivered", &self.delivered)
            .finish()
    }
}
