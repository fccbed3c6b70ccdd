use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::timer::DiscoveryTimer;
use crate::domain::{Envelope, PeerId, PeerManagerStats, TickOutcome, TransportError};
use crate::ports::TimerHandle;
use crate::service::PeerManager;

/// Local command for a running node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeCommand {
    /// Open a connection.
    Connect(PeerId),
    /// Say goodbye and disconnect.
    Drop(PeerId),
    /// Send an application message to every active peer.
    Broadcast {
        /// Application message name
        name: String,
        /// Application body
        obj: Value,
    },
}

/// Control handle for a node task.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    id: PeerId,
    commands: mpsc::UnboundedSender<NodeCommand>,
    stats: watch::Receiver<PeerManagerStats>,
    timer: Arc<DiscoveryTimer>,
}

impl NodeHandle {
    /// The node's id.
    pub fn id(&self) -> PeerId {
        self.id
    }

    /// Queue a command for the node task.
    ///
    /// # Errors
    ///
    /// Fails once the node task has exited.
    pub fn send(&self, command: NodeCommand) -> Result<(), TransportError> {
        self.commands
            .send(command)
            .map_err(|_| TransportError::ChannelClosed(self.id))
    }

    /// Latest published stats.
    pub fn stats(&self) -> PeerManagerStats {
        *self.stats.borrow()
    }

    /// Stats receiver, for waiting on changes.
    pub fn watch_stats(&self) -> watch::Receiver<PeerManagerStats> {
        self.stats.clone()
    }

    /// True once the discovery timer was cancelled.
    pub fn discovery_cancelled(&self) -> bool {
        self.timer.is_cancelled()
    }
}

/// Drives one peer manager from its inbox, a discovery interval, and local
/// commands.
///
/// Every event is handled to completion before the next one is taken, so
/// the manager sees strictly serialized calls.
pub struct NodeRuntime {
    manager: PeerManager,
    inbox: mpsc::UnboundedReceiver<Envelope>,
    commands: mpsc::UnboundedReceiver<NodeCommand>,
    stats: watch::Sender<PeerManagerStats>,
    timer: Arc<DiscoveryTimer>,
    interval: Duration,
}

impl NodeRuntime {
    /// Wrap a manager and its inbox.
    pub fn new(
        manager: PeerManager,
        inbox: mpsc::UnboundedReceiver<Envelope>,
    ) -> (Self, NodeHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (stats_tx, stats_rx) = watch::channel(manager.stats());
        let timer = Arc::new(DiscoveryTimer::new());
        let interval = Duration::from_millis(manager.config().discovery_interval_ms);

        let handle = NodeHandle {
            id: manager.local_id(),
            commands: command_tx,
            stats: stats_rx,
            timer: Arc::clone(&timer),
        };
        let runtime = Self {
            manager,
            inbox,
            commands: command_rx,
            stats: stats_tx,
            timer,
            interval,
        };
        (runtime, handle)
    }

    /// Run until shutdown is signalled or the inbox closes, then hand the
    /// manager back for inspection.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> PeerManager {
        let node = self.manager.local_id();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            node = %node,
            interval_ms = self.manager.config().discovery_interval_ms,
            "[peermgr] Node started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!(node = %node, "[peermgr] Shutdown signal received");
                        break;
                    }
                }
                envelope = self.inbox.recv() => {
                    let Some(envelope) = envelope else {
                        debug!(node = %node, "[peermgr] Inbox closed");
                        break;
                    };
                    self.manager.handle_message(envelope.from, envelope.message);
                }
                Some(command) = self.commands.recv() => {
                    self.apply(command);
                }
                _ = ticker.tick(), if !self.timer.is_cancelled() => {
                    if self.manager.on_discovery_timer(self.timer.as_ref()) == TickOutcome::Stop {
                        debug!(node = %node, "[peermgr] Discovery timer cancelled");
                    }
                }
            }
            self.stats.send_replace(self.manager.stats());
        }

        self.manager
    }

    fn apply(&mut self, command: NodeCommand) {
        match command {
            NodeCommand::Connect(peer) => {
                self.manager.connect(peer);
            }
            NodeCommand::Drop(peer) => {
                self.manager.drop_connection(peer);
            }
            NodeCommand::Broadcast { name, obj } => {
                self.manager.broadcast(&name, obj);
            }
        }
    }
}

impl std::fmt::Debug for NodeRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRuntime")
            .field("manager", &self.manager)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
