//! # Integration Tests
//!
//! Multi-node behavior of the peer manager, driven through the
//! deterministic `SimNetwork` or real tokio tasks.

pub mod convergence;
pub mod faults;
pub mod runtime;

use peer_manager::test_utils::SimNetwork;
use peer_manager::{PeerId, PeerManagerConfig};

/// Tick interval used by simulated rounds.
pub const ROUND_MS: u64 = 10;

/// Build a swarm of nodes `0..count` that all know node 0.
pub fn seeded_swarm(count: u64, max_peers: usize) -> SimNetwork {
    let mut net = SimNetwork::new();
    for id in 0..count {
        let config = PeerManagerConfig::for_testing()
            .with_max_peers(max_peers)
            .with_bootstrap_nodes(vec![PeerId::new(0)])
            .with_rng_seed(id);
        net.add_node(PeerId::new(id), config)
            .expect("valid swarm config");
    }
    net
}

/// Panic with context if any node breaks an invariant.
pub fn assert_all_invariants(net: &SimNetwork, context: &str) {
    if let Err((node, violation)) = net.check_invariants_all() {
        panic!("{context}: {node} violated invariant: {violation}");
    }
}

/// Run `rounds` rounds, checking invariants after each.
pub fn run_checked(net: &mut SimNetwork, rounds: usize) {
    for round in 0..rounds {
        net.run_rounds(1, ROUND_MS);
        assert_all_invariants(net, &format!("round {round}"));
    }
}
