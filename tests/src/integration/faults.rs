//! # Fault Tolerance
//!
//! The substrate gives no delivery guarantee. These tests lose, reorder,
//! duplicate and misaddress messages and check that every node keeps a
//! consistent connection table and archive throughout.

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use serde_json::json;

    use super::super::{assert_all_invariants, run_checked, seeded_swarm, ROUND_MS};
    use peer_manager::test_utils::SimNetwork;
    use peer_manager::{
        ApplicationMessage, Disposition, Envelope, IgnoreReason, PeerCandidate, PeerId,
        PeerManagerConfig, ProtocolMessage, Timestamp,
    };

    fn peer(id: u64) -> PeerId {
        PeerId::new(id)
    }

    // =============================================================================
    // TEST GROUP 1: Loss
    // =============================================================================

    #[test]
    fn test_lost_connect_leaves_pending_forever() {
        let a = peer(1);
        let b = peer(2);
        let mut net = SimNetwork::new();
        net.add_node(
            a,
            PeerManagerConfig::for_testing()
                .with_max_peers(1)
                .with_bootstrap_nodes(vec![b]),
        )
        .unwrap();
        net.add_node(b, PeerManagerConfig::for_testing()).unwrap();

        net.tick_all();
        assert_eq!(net.drop_all(), 1);
        net.run_rounds(20, ROUND_MS);

        // No timeout: the pending slot still counts toward the quota.
        let stats = net.node(a).unwrap().stats();
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.active, 0);
        assert!(stats.discovery_stopped);
        assert_eq!(net.node(b).unwrap().num_peers(), 0);
        assert_all_invariants(&net, "after loss");
    }

    #[test]
    fn test_random_loss_keeps_invariants() {
        let mut net = seeded_swarm(10, 3);
        let mut rng = StdRng::seed_from_u64(11);

        for round in 0..40 {
            net.tick_all();
            net.clock().advance(ROUND_MS);
            while net.pending() > 0 {
                let mut queue = net.take_queue();
                // Drop roughly a third of the traffic.
                queue.retain(|_| rng.gen_range(0..3) != 0);
                for envelope in queue {
                    net.deliver(envelope);
                }
            }
            assert_all_invariants(&net, &format!("lossy round {round}"));
        }
    }

    // =============================================================================
    // TEST GROUP 2: Reordering and duplication
    // =============================================================================

    #[test]
    fn test_shuffled_duplicated_delivery_keeps_invariants() {
        let mut net = seeded_swarm(10, 3);
        let mut rng = StdRng::seed_from_u64(3);

        for round in 0..40 {
            net.tick_all();
            net.clock().advance(ROUND_MS);

            let mut queue = net.take_queue();
            let copies = queue.clone();
            queue.extend(copies);
            queue.shuffle(&mut rng);
            for envelope in queue {
                net.inject(envelope);
            }

            while net.step().is_some() {
                assert_all_invariants(&net, &format!("round {round}"));
            }

            for id in net.node_ids() {
                assert!(net.node(id).unwrap().num_peers() <= 3, "{id} over quota");
            }
        }
    }

    #[test]
    fn test_duplicate_connect_is_answered_once() {
        let a = peer(1);
        let b = peer(2);
        let mut net = SimNetwork::new();
        net.add_node(a, PeerManagerConfig::for_testing()).unwrap();
        net.add_node(b, PeerManagerConfig::for_testing()).unwrap();

        let connect = Envelope::new(a, b, ProtocolMessage::Connect);
        assert_eq!(net.deliver(connect.clone()), Some(Disposition::Handled));
        assert_eq!(
            net.deliver(connect),
            Some(Disposition::Ignored(IgnoreReason::AlreadyConnected))
        );

        let replies = net.take_queue();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].message, ProtocolMessage::Accept);
        assert_eq!(net.upstream(b).unwrap().connected(), vec![a]);
    }

    // =============================================================================
    // TEST GROUP 3: Strangers and departures
    // =============================================================================

    #[test]
    fn test_messages_from_strangers_change_nothing() {
        let mut net = seeded_swarm(6, 3);
        run_checked(&mut net, 3);

        let before = net.node(peer(0)).unwrap().stats();
        let stranger = peer(99);
        let candidates = vec![PeerCandidate::new(peer(42), Timestamp::from_millis(0))];
        let messages = vec![
            ProtocolMessage::Accept,
            ProtocolMessage::Reject(candidates.clone()),
            ProtocolMessage::Disconnect,
            ProtocolMessage::PeerList(candidates),
            ProtocolMessage::GetPeers,
            ProtocolMessage::Application(ApplicationMessage::new("x", json!(1))),
        ];

        for message in messages {
            let disposition = net.deliver(Envelope::new(stranger, peer(0), message));
            assert_eq!(
                disposition,
                Some(Disposition::Ignored(IgnoreReason::UnknownPeer))
            );
        }

        assert_eq!(net.pending(), 0);
        assert_eq!(net.node(peer(0)).unwrap().stats(), before);
        assert!(net.upstream(peer(0)).unwrap().application_messages().is_empty());
    }

    #[test]
    fn test_drop_connection_archives_both_sides() {
        let mut net = seeded_swarm(8, 3);
        run_checked(&mut net, 5);

        let seed = peer(0);
        let leaving = net.node(seed).unwrap().active_peers()[0];

        net.node_mut(seed).unwrap().drop_connection(leaving);
        net.deliver_all();

        let seed_node = net.node(seed).unwrap();
        let other = net.node(leaving).unwrap();
        assert!(!seed_node.is_active(&leaving));
        assert!(!other.is_active(&seed));
        assert!(seed_node.archive().contains(&leaving));
        assert!(other.archive().contains(&seed));
        assert!(net
            .upstream(leaving)
            .unwrap()
            .events()
            .contains(&peer_manager::UpstreamEvent::Disconnected(seed)));
        assert_all_invariants(&net, "after drop");

        run_checked(&mut net, 20);
    }

    #[test]
    fn test_departed_node_is_not_detected() {
        let mut net = seeded_swarm(6, 3);
        run_checked(&mut net, 3);

        let gone = net.node(peer(0)).unwrap().active_peers()[0];
        net.remove_node(gone);

        // No liveness check: the departed peer stays active until someone
        // disconnects it, and traffic to it is silently lost.
        assert!(net.node(peer(0)).unwrap().is_active(&gone));
        net.node(peer(0)).unwrap().broadcast("ping", json!(null));
        assert_eq!(net.step(), Some(None));

        run_checked(&mut net, 10);
        assert!(net.node(peer(0)).unwrap().is_active(&gone));
    }
}
