use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::Timestamp;
use crate::ports::TimeSource;

/// A time source the test advances by hand.
///
/// Clones share the same clock, so a test can keep one handle while the
/// peer manager owns another.
///
/// # Example
///
/// ```rust,ignore
/// use peer_manager::test_utils::ManualClock;
/// use peer_manager::TimeSource;
///
/// let clock = ManualClock::new(1000);
/// let handle = clock.clone();
/// handle.advance(250);
/// assert_eq!(clock.now().as_millis(), 1250);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock at the given time in milliseconds.
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(millis)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }
}
