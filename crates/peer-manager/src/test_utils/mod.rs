//! # Test Utilities
//!
//! Shared fakes for unit tests, integration tests and doc examples.
//! Compiled for tests and behind the `test-utils` feature.

mod clock;
mod recording;
mod sim;

pub use clock::ManualClock;
pub use recording::{RecordingSink, RecordingUpstream};
pub use sim::SimNetwork;

use crate::domain::{PeerId, PeerManagerConfig};
use crate::service::PeerManager;

/// A peer manager wired to recording fakes, plus handles to inspect them.
#[derive(Debug)]
pub struct Harness {
    pub manager: PeerManager,
    pub sink: RecordingSink,
    pub upstream: RecordingUpstream,
    pub clock: ManualClock,
}

impl Harness {
    /// Build a manager for `local_id`.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails validation.
    pub fn new(local_id: PeerId, config: PeerManagerConfig) -> Self {
        let sink = RecordingSink::new();
        let upstream = RecordingUpstream::new();
        let clock = ManualClock::new(1_000);
        let manager = PeerManager::new(
            local_id,
            config,
            Box::new(sink.clone()),
            Box::new(upstream.clone()),
            Box::new(clock.clone()),
        )
        .expect("valid test config");
        Self {
            manager,
            sink,
            upstream,
            clock,
        }
    }
}
