use std::sync::atomic::{AtomicBool, Ordering};

use crate::ports::TimerHandle;

/// Cancellation flag for a node's discovery interval.
///
/// Shared between the node task and its handle; once cancelled it stays
/// cancelled.
#[derive(Debug, Default)]
pub struct DiscoveryTimer {
    cancelled: AtomicBool,
}

impl DiscoveryTimer {
    /// Create a running timer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimerHandle for DiscoveryTimer {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
