//! # Peer Simulator
//!
//! Spawns a swarm of peer managers on one tokio runtime, lets them discover
//! each other through a single bootstrap node, and logs how the mesh
//! converges.
//!
//! ## Environment
//!
//! - `PEERMGR_CONFIG` - Path to a TOML config file (see `TomlConfigProvider`)
//! - `PEERMGR_NODES` - Number of nodes, ids `0..n` (default: 16)
//! - `PEERMGR_MAX_PEERS` - Connection target per node
//! - `PEERMGR_INTERVAL_MS` - Discovery tick interval
//! - `PEERMGR_DURATION_SECS` - How long to run before shutting down (default: 5)
//! - `RUST_LOG` - Log filter (default: `info`)

use std::time::Duration;

use anyhow::{bail, Context, Result};
use peer_manager::adapters::runtime::{spawn_node, InMemoryNetwork, NodeHandle};
use peer_manager::adapters::{StaticConfigProvider, TomlConfigProvider};
use peer_manager::{ConfigProvider, PeerId, PeerManager, PeerManagerConfig};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Simulation settings on top of the per-node config.
#[derive(Debug, Clone)]
struct SimConfig {
    nodes: u64,
    duration: Duration,
    peer: PeerManagerConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            nodes: 16,
            duration: Duration::from_secs(5),
            peer: PeerManagerConfig::default(),
        }
    }
}

/// Read an environment variable and parse it, warning on garbage.
fn env_override<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{} is not a valid value: {:?}", key, raw);
            None
        }
    }
}

/// Load configuration from an optional file, then apply environment overrides.
fn load_config() -> Result<SimConfig> {
    let provider: Box<dyn ConfigProvider> = match std::env::var("PEERMGR_CONFIG") {
        Ok(path) => {
            let provider = TomlConfigProvider::load(&path)
                .with_context(|| format!("loading config from {path}"))?;
            info!("Loaded config from {}", path);
            Box::new(provider)
        }
        Err(_) => Box::new(StaticConfigProvider::new()),
    };

    let mut config = SimConfig {
        peer: provider.get_config(),
        ..SimConfig::default()
    };

    if let Some(nodes) = env_override("PEERMGR_NODES") {
        config.nodes = nodes;
    }
    if let Some(max_peers) = env_override("PEERMGR_MAX_PEERS") {
        config.peer.max_peers = max_peers;
    }
    if let Some(interval) = env_override("PEERMGR_INTERVAL_MS") {
        config.peer.discovery_interval_ms = interval;
    }
    if let Some(secs) = env_override("PEERMGR_DURATION_SECS") {
        config.duration = Duration::from_secs(secs);
    }

    if config.nodes < 2 {
        bail!("PEERMGR_NODES must be at least 2");
    }
    config.peer.validate()?;
    Ok(config)
}

/// Log one line summarizing the swarm.
fn log_progress(handles: &[NodeHandle]) {
    let mut active = 0;
    let mut pending = 0;
    let mut stopped = 0;
    for handle in handles {
        let stats = handle.stats();
        active += stats.active;
        pending += stats.pending;
        if stats.discovery_stopped {
            stopped += 1;
        }
    }
    info!(
        nodes = handles.len(),
        active,
        pending,
        stopped,
        "[peer-sim] Progress"
    );
}

/// Final per-node report; returns the number of invariant violations.
fn report(managers: &[PeerManager]) -> usize {
    let mut violations = 0;
    for manager in managers {
        let stats = manager.stats();
        info!(
            node = %manager.local_id(),
            active = stats.active,
            pending = stats.pending,
            archived = stats.archived,
            stopped = stats.discovery_stopped,
            "[peer-sim] Final state"
        );
        if let Err(e) = manager.check_invariants() {
            warn!(node = %manager.local_id(), error = %e, "[peer-sim] Invariant violated");
            violations += 1;
        }
    }
    violations
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config()?;
    info!(
        nodes = config.nodes,
        max_peers = config.peer.max_peers,
        interval_ms = config.peer.discovery_interval_ms,
        duration_secs = config.duration.as_secs(),
        "[peer-sim] Starting swarm"
    );

    let network = InMemoryNetwork::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut handles = Vec::new();
    let mut tasks: Vec<JoinHandle<PeerManager>> = Vec::new();
    for id in 0..config.nodes {
        let node = spawn_node(
            &network,
            PeerId::new(id),
            config.peer.clone(),
            shutdown_rx.clone(),
        )?;

        // Drain upstream notifications so the channel never grows unbounded.
        let mut events = node.events;
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                debug!(node = id, ?event, "[peer-sim] Upstream event");
            }
        });

        handles.push(node.handle);
        tasks.push(node.task);
    }

    let mut progress = tokio::time::interval(Duration::from_secs(1));
    let deadline = tokio::time::sleep(config.duration);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = progress.tick() => log_progress(&handles),
            _ = tokio::signal::ctrl_c() => {
                info!("[peer-sim] Interrupted");
                break;
            }
        }
    }

    info!("[peer-sim] Shutting down");
    shutdown_tx.send(true)?;

    let mut managers = Vec::with_capacity(tasks.len());
    for task in tasks {
        managers.push(task.await?);
    }

    let violations = report(&managers);
    if violations > 0 {
        bail!("{violations} node(s) violated invariants");
    }
    Ok(())
}
