//! # Runtime Integration
//!
//! Peer managers running as tokio tasks over the in-memory network, with
//! real timers and concurrent delivery.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::sync::watch;
    use tokio::time::timeout;

    use peer_manager::adapters::runtime::{spawn_node, InMemoryNetwork, NodeCommand, SpawnedNode};
    use peer_manager::{PeerId, PeerManagerConfig, UpstreamEvent};

    fn config(max_peers: usize) -> PeerManagerConfig {
        PeerManagerConfig::for_testing()
            .with_max_peers(max_peers)
            .with_bootstrap_nodes(vec![PeerId::new(0)])
    }

    fn spawn_swarm(
        network: &InMemoryNetwork,
        count: u64,
        max_peers: usize,
        shutdown: &watch::Receiver<bool>,
    ) -> Vec<SpawnedNode> {
        (0..count)
            .map(|id| {
                spawn_node(network, PeerId::new(id), config(max_peers), shutdown.clone())
                    .expect("valid config")
            })
            .collect()
    }

    #[tokio::test]
    async fn test_bootstrap_reaches_quota_and_stops() {
        let network = InMemoryNetwork::new();
        let (shutdown_tx, shutdown) = watch::channel(false);
        let nodes = spawn_swarm(&network, 6, 3, &shutdown);

        let mut seed_stats = nodes[0].handle.watch_stats();
        timeout(
            Duration::from_secs(5),
            seed_stats.wait_for(|s| s.active == 3 && s.discovery_stopped),
        )
        .await
        .expect("bootstrap fills up")
        .unwrap();
        assert!(nodes[0].handle.discovery_cancelled());

        shutdown_tx.send(true).unwrap();
        for node in nodes {
            let manager = node.task.await.unwrap();
            assert!(manager.check_invariants().is_ok());
            assert!(manager.num_peers() <= 3);
        }
    }

    #[tokio::test]
    async fn test_broadcast_over_runtime() {
        let network = InMemoryNetwork::new();
        let (shutdown_tx, shutdown) = watch::channel(false);
        let mut nodes = spawn_swarm(&network, 3, 2, &shutdown);

        // Node 0 accepts both joiners.
        let mut seed_stats = nodes[0].handle.watch_stats();
        timeout(Duration::from_secs(5), seed_stats.wait_for(|s| s.active == 2))
            .await
            .expect("joiners connect")
            .unwrap();

        nodes[0]
            .handle
            .send(NodeCommand::Broadcast {
                name: "block".to_string(),
                obj: json!({"height": 1}),
            })
            .unwrap();

        for node in nodes.iter_mut().skip(1) {
            let received = timeout(Duration::from_secs(5), async {
                loop {
                    match node.events.recv().await {
                        Some(UpstreamEvent::Application { from, message }) => {
                            break (from, message)
                        }
                        Some(_) => continue,
                        None => panic!("event channel closed"),
                    }
                }
            })
            .await
            .expect("application message arrives");
            assert_eq!(received.0, PeerId::new(0));
            assert_eq!(received.1.name, "block");
        }

        shutdown_tx.send(true).unwrap();
        for node in nodes {
            node.task.await.unwrap();
        }
    }
}
