//! Protocol message names.

use std::fmt;
use std::str::FromStr;

use crate::domain::PeerManagerError;

/// Every message type the peer manager owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MessageKind {
    /// Connection request.
    Connect,
    /// Connection granted.
    Accept,
    /// Connection refused, with alternative candidates.
    Reject,
    /// Connection closed by the remote side.
    Disconnect,
    /// Candidate list.
    PeerList,
    /// Request for a candidate list.
    GetPeers,
    /// Application payload carried between connected peers.
    Application,
}

impl MessageKind {
    /// All kinds, in registration order.
    pub const ALL: [MessageKind; 7] = [
        MessageKind::Connect,
        MessageKind::Accept,
        MessageKind::Reject,
        MessageKind::Disconnect,
        MessageKind::PeerList,
        MessageKind::GetPeers,
        MessageKind::Application,
    ];

    /// Wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Disconnect => "disconnect",
            Self::PeerList => "peerlist",
            Self::GetPeers => "getpeers",
            Self::Application => "__peermsg",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = PeerManagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PeerManagerError::UnknownMessageType(s.to_string()))
    }
}
