//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces this crate **requires** the host to implement:
//! message delivery, a clock, upward notifications, a cancellable timer,
//! and a configuration source.

use crate::domain::{
    ApplicationMessage, PeerId, PeerManagerConfig, ProtocolMessage, Timestamp, TransportError,
};

/// Best-effort delivery of protocol messages to named peers.
///
/// The peer manager never waits for or correlates a response. A failed send
/// is logged and otherwise ignored.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct UdpSink { socket: UdpSocket, book: AddressBook }
///
/// impl MessageSink for UdpSink {
///     fn send(&self, target: PeerId, message: ProtocolMessage) -> Result<(), TransportError> {
///         let addr = self.book.lookup(target).ok_or(TransportError::UnknownPeer(target))?;
///         let (name, payload) = message.into_parts();
///         // frame and send...
///         todo!()
///     }
/// }
/// ```
pub trait MessageSink: Send + Sync {
    /// Send a message to a peer.
    fn send(&self, target: PeerId, message: ProtocolMessage) -> Result<(), TransportError>;
}

/// Abstract interface for time.
///
/// Enables deterministic testing by injecting controllable clocks.
pub trait TimeSource: Send + Sync {
    /// Current timestamp, monotonic non-decreasing.
    fn now(&self) -> Timestamp;
}

/// Upward notifications to the layer above the peer manager.
///
/// The peer manager emits these but never consumes them.
pub trait UpstreamHandler: Send + Sync {
    /// A logical connection to `peer` now exists.
    fn on_peer_connected(&self, peer: PeerId);

    /// An application message arrived from a connected peer.
    fn on_application_message(&self, from: PeerId, message: ApplicationMessage);

    /// An active connection to `peer` ended.
    fn on_peer_disconnected(&self, _peer: PeerId) {}
}

/// Handle to the host's repeating discovery timer.
pub trait TimerHandle {
    /// Stop further invocations.
    fn cancel(&self);

    /// True once cancelled.
    fn is_cancelled(&self) -> bool;
}

/// Abstract interface for configuration loading.
pub trait ConfigProvider: Send + Sync {
    /// Peer manager configuration, including bootstrap seeds.
    fn get_config(&self) -> PeerManagerConfig;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Test-only TimeSource returning a fixed timestamp.
    struct FixedTimeSource(u64);

    impl TimeSource for FixedTimeSource {
        fn now(&self) -> Timestamp {
            Timestamp::from_millis(self.0)
        }
    }

    struct FlagTimer(Cell<bool>);

    impl TimerHandle for FlagTimer {
        fn cancel(&self) {
            self.0.set(true);
        }

        fn is_cancelled(&self) -> bool {
            self.0.get()
        }
    }

    #[test]
    fn test_fixed_time_source_returns_configured_value() {
        let source = FixedTimeSource(1000);
        assert_eq!(source.now().as_millis(), 1000);
    }

    #[test]
    fn test_timer_handle_cancel() {
        let timer = FlagTimer(Cell::new(false));
        assert!(!timer.is_cancelled());
        timer.cancel();
        assert!(timer.is_cancelled());
    }
}
