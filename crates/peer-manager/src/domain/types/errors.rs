//! Domain Errors for the Peer Manager
//!
//! Protocol handlers never return these: a message that does not fit the
//! current relationship state is ignored and reported as a [`Disposition`].
//! Errors are reserved for decoding and configuration failures. Transport
//! failures are only logged.

use std::fmt;
use thiserror::Error;

use super::entities::PeerId;

/// Errors surfaced by the peer manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerManagerError {
    /// Inbound message name is not part of the protocol.
    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),

    /// Payload does not match the shape of its message type.
    #[error("Malformed {kind} payload: {reason}")]
    MalformedPayload {
        /// Wire name of the message
        kind: &'static str,
        /// Decoder error
        reason: String,
    },

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors from the message substrate.
///
/// Sends are fire-and-forget, so the manager only logs these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No route to the target node.
    #[error("No route to {0}")]
    UnknownPeer(PeerId),

    /// The target's inbox has been closed.
    #[error("Inbox of {0} is closed")]
    ChannelClosed(PeerId),
}

/// Outcome of feeding one event to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The event changed state or produced messages.
    Handled,
    /// The event did not fit the current state and was dropped.
    Ignored(IgnoreReason),
}

impl Disposition {
    /// True if the event was applied.
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Why an event was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Target or sender is the local node.
    SelfConnection,
    /// Sender is already in the connection table.
    AlreadyConnected,
    /// Sender is not in the connection table.
    UnknownPeer,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfConnection => write!(f, "self connection"),
            Self::AlreadyConnected => write!(f, "already connected"),
            Self::UnknownPeer => write!(f, "unknown peer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_payload_display() {
        let err = PeerManagerError::MalformedPayload {
            kind: "peerlist",
            reason: "expected a sequence".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed peerlist payload: expected a sequence"
        );
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::UnknownPeer(PeerId::new(4));
        assert_eq!(err.to_string(), "No route to peer#4");
    }

    #[test]
    fn test_disposition_is_handled() {
        assert!(Disposition::Handled.is_handled());
        assert!(!Disposition::Ignored(IgnoreReason::UnknownPeer).is_handled());
    }

    #[test]
    fn test_ignore_reason_display() {
        assert_eq!(IgnoreReason::SelfConnection.to_string(), "self connection");
        assert_eq!(IgnoreReason::AlreadyConnected.to_string(), "already connected");
        assert_eq!(IgnoreReason::UnknownPeer.to_string(), "unknown peer");
    }
}
