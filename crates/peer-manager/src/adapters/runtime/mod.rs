//! # Tokio Runtime Adapter
//!
//! Runs peer managers as tokio tasks over an in-process network:
//!
//! - `InMemoryNetwork` - Per-node unbounded inboxes
//! - `NetworkSender` - `MessageSink` into that network
//! - `ChannelUpstream` - `UpstreamHandler` feeding an mpsc channel
//! - `DiscoveryTimer` - Cancellable `TimerHandle`
//! - `NodeRuntime` - Select loop over inbox, commands, ticks and shutdown

mod network;
mod node;
mod timer;

pub use network::{ChannelUpstream, InMemoryNetwork, NetworkSender};
pub use node::{NodeCommand, NodeHandle, NodeRuntime};
pub use timer::DiscoveryTimer;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::adapters::SystemTimeSource;
use crate::domain::{PeerId, PeerManagerConfig, PeerManagerError, UpstreamEvent};
use crate::service::PeerManager;

/// A node running on the current tokio runtime.
#[derive(Debug)]
pub struct SpawnedNode {
    /// Control handle
    pub handle: NodeHandle,
    /// Resolves to the final manager state after shutdown
    pub task: JoinHandle<PeerManager>,
    /// Upstream notifications
    pub events: mpsc::UnboundedReceiver<UpstreamEvent>,
}

/// Register `id` on `network`, build its manager, and spawn its node task.
///
/// # Errors
///
/// Returns [`PeerManagerError::InvalidConfig`] if `config` fails validation;
/// nothing is registered in that case.
pub fn spawn_node(
    network: &InMemoryNetwork,
    id: PeerId,
    config: PeerManagerConfig,
    shutdown: watch::Receiver<bool>,
) -> Result<SpawnedNode, PeerManagerError> {
    config.validate()?;

    let (sink, inbox) = network.register(id);
    let (upstream, events) = ChannelUpstream::new();
    let manager = PeerManager::new(
        id,
        config,
        Box::new(sink),
        Box::new(upstream),
        Box::new(SystemTimeSource::new()),
    )?;

    let (runtime, handle) = NodeRuntime::new(manager, inbox);
    let task = tokio::spawn(runtime.run(shutdown));

    Ok(SpawnedNode {
        handle,
        task,
        events,
    })
}
