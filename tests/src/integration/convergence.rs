//! # Swarm Convergence
//!
//! Every node starts knowing only the bootstrap node 0. Node 0 fills up,
//! then answers every further connect with a rejection carrying its archive,
//! which is how the rest of the swarm learns about each other.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::{assert_all_invariants, run_checked, seeded_swarm, ROUND_MS};
    use peer_manager::{PeerId, TickOutcome};

    const SWARM: u64 = 12;
    const MAX_PEERS: usize = 3;

    fn peer(id: u64) -> PeerId {
        PeerId::new(id)
    }

    // =============================================================================
    // TEST GROUP 1: Bootstrap
    // =============================================================================

    #[test]
    fn test_bootstrap_fills_then_stops() {
        let mut net = seeded_swarm(SWARM, MAX_PEERS);

        run_checked(&mut net, 1);
        let seed = net.node(peer(0)).unwrap();
        assert_eq!(seed.active_peers(), vec![peer(1), peer(2), peer(3)]);
        assert!(!seed.discovery_stopped());

        let outcomes = net.tick_all();
        assert_eq!(outcomes[&peer(0)], TickOutcome::Stop);
        net.deliver_all();
        assert!(net.node(peer(0)).unwrap().discovery_stopped());
        assert_all_invariants(&net, "after second tick");
    }

    #[test]
    fn test_rejection_hands_out_bootstrap_archive() {
        let mut net = seeded_swarm(SWARM, MAX_PEERS);

        run_checked(&mut net, 1);

        // Node 0 parked every refused connector at its archive front.
        let seed_archive: Vec<u64> = net
            .node(peer(0))
            .unwrap()
            .archive_ids()
            .iter()
            .map(PeerId::as_u64)
            .collect();
        assert_eq!(seed_archive, (4..SWARM).rev().collect::<Vec<_>>());

        // The last connector heard about all earlier ones, then re-archived
        // node 0 behind them.
        let last: Vec<u64> = net
            .node(peer(SWARM - 1))
            .unwrap()
            .archive_ids()
            .iter()
            .map(PeerId::as_u64)
            .collect();
        let mut expected: Vec<u64> = (4..SWARM - 1).collect();
        expected.push(0);
        assert_eq!(last, expected);
    }

    // =============================================================================
    // TEST GROUP 2: Mesh formation
    // =============================================================================

    #[test]
    fn test_mesh_spreads_beyond_bootstrap() {
        let mut net = seeded_swarm(SWARM, MAX_PEERS);

        run_checked(&mut net, 30);

        let connected = net
            .node_ids()
            .into_iter()
            .filter(|id| !net.node(*id).unwrap().active_peers().is_empty())
            .count();
        // Node 0 alone can serve MAX_PEERS nodes; anything beyond that was
        // discovered transitively.
        assert!(
            connected > MAX_PEERS + 1,
            "only {connected} nodes connected"
        );
    }

    #[test]
    fn test_quota_never_exceeded() {
        let mut net = seeded_swarm(SWARM, MAX_PEERS);

        for _ in 0..30 {
            net.run_rounds(1, ROUND_MS);
            for id in net.node_ids() {
                let node = net.node(id).unwrap();
                assert!(node.num_peers() <= MAX_PEERS, "{id} over quota");
            }
        }
    }

    #[test]
    fn test_active_connections_are_mutual() {
        let mut net = seeded_swarm(SWARM, MAX_PEERS);

        run_checked(&mut net, 30);

        for id in net.node_ids() {
            for other in net.node(id).unwrap().active_peers() {
                assert!(
                    net.node(other).unwrap().is_active(&id),
                    "{id} sees {other} active but not the other way round"
                );
            }
        }
    }

    #[test]
    fn test_stopped_nodes_are_at_quota() {
        let mut net = seeded_swarm(SWARM, MAX_PEERS);

        run_checked(&mut net, 30);

        for id in net.node_ids() {
            let stats = net.node(id).unwrap().stats();
            if stats.discovery_stopped {
                assert!(stats.num_peers() >= MAX_PEERS);
            }
        }
    }

    #[test]
    fn test_upstream_sees_each_connection_once() {
        let mut net = seeded_swarm(SWARM, MAX_PEERS);

        run_checked(&mut net, 30);

        for id in net.node_ids() {
            let mut connected = net.upstream(id).unwrap().connected();
            let total = connected.len();
            connected.sort();
            connected.dedup();
            assert_eq!(connected.len(), total, "{id} notified twice");
            assert_eq!(total, net.node(id).unwrap().active_peers().len());
        }
    }

    // =============================================================================
    // TEST GROUP 3: Application traffic
    // =============================================================================

    #[test]
    fn test_broadcast_reaches_active_neighbours() {
        let mut net = seeded_swarm(SWARM, MAX_PEERS);
        run_checked(&mut net, 5);

        let neighbours = net.node(peer(0)).unwrap().active_peers();
        let sent = net
            .node(peer(0))
            .unwrap()
            .broadcast("tx", json!({"hash": "ab12"}));
        net.deliver_all();

        assert_eq!(sent, neighbours.len());
        for id in net.node_ids() {
            let received = net.upstream(id).unwrap().application_messages();
            if neighbours.contains(&id) {
                assert_eq!(received.len(), 1);
                assert_eq!(received[0].0, peer(0));
                assert_eq!(received[0].1.name, "tx");
            } else {
                assert!(received.is_empty(), "{id} was not a neighbour");
            }
        }
    }
}
