//! Typed protocol messages and their named JSON form.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::kind::MessageKind;
use crate::domain::{PeerCandidate, PeerId, PeerManagerError};

/// Application payload wrapped in a `__peermsg` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationMessage {
    /// Application-level message name.
    pub name: String,
    /// Opaque application body.
    #[serde(default)]
    pub obj: Value,
}

impl ApplicationMessage {
    /// Create an application message.
    pub fn new(name: impl Into<String>, obj: Value) -> Self {
        Self {
            name: name.into(),
            obj,
        }
    }
}

/// A control or application message exchanged between peer managers.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolMessage {
    /// `connect {}`
    Connect,
    /// `accept {}`
    Accept,
    /// `reject [PeerCandidate...]`
    Reject(Vec<PeerCandidate>),
    /// `disconnect {}`
    Disconnect,
    /// `peerlist [PeerCandidate...]`
    PeerList(Vec<PeerCandidate>),
    /// `getpeers {}`
    GetPeers,
    /// `__peermsg {name, obj}`
    Application(ApplicationMessage),
}

impl ProtocolMessage {
    /// Kind of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Connect => MessageKind::Connect,
            Self::Accept => MessageKind::Accept,
            Self::Reject(_) => MessageKind::Reject,
            Self::Disconnect => MessageKind::Disconnect,
            Self::PeerList(_) => MessageKind::PeerList,
            Self::GetPeers => MessageKind::GetPeers,
            Self::Application(_) => MessageKind::Application,
        }
    }

    /// Wire name and JSON payload.
    pub fn into_parts(self) -> (&'static str, Value) {
        let name = self.kind().as_str();
        let payload = match self {
            Self::Connect | Self::Accept | Self::Disconnect | Self::GetPeers => json!({}),
            Self::Reject(candidates) | Self::PeerList(candidates) => {
                Value::Array(candidates.iter().map(candidate_to_value).collect())
            }
            Self::Application(msg) => json!({ "name": msg.name, "obj": msg.obj }),
        };
        (name, payload)
    }

    /// Decode a named JSON payload.
    ///
    /// Bodies of the empty control messages are not inspected.
    pub fn from_parts(name: &str, payload: Value) -> Result<Self, PeerManagerError> {
        let kind: MessageKind = name.parse()?;
        let message = match kind {
            MessageKind::Connect => Self::Connect,
            MessageKind::Accept => Self::Accept,
            MessageKind::Disconnect => Self::Disconnect,
            MessageKind::GetPeers => Self::GetPeers,
            MessageKind::Reject => Self::Reject(decode(kind, payload)?),
            MessageKind::PeerList => Self::PeerList(decode(kind, payload)?),
            MessageKind::Application => Self::Application(decode(kind, payload)?),
        };
        Ok(message)
    }
}

/// A message in flight between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Sending node
    pub from: PeerId,
    /// Receiving node
    pub to: PeerId,
    /// Message body
    pub message: ProtocolMessage,
}

impl Envelope {
    /// Create an envelope.
    pub fn new(from: PeerId, to: PeerId, message: ProtocolMessage) -> Self {
        Self { from, to, message }
    }
}

fn candidate_to_value(candidate: &PeerCandidate) -> Value {
    json!({
        "id": candidate.id.as_u64(),
        "lastSeenTimestamp": candidate.last_seen.as_millis(),
    })
}

fn decode<T: serde::de::DeserializeOwned>(
    kind: MessageKind,
    payload: Value,
) -> Result<T, PeerManagerError> {
    serde_json::from_value(payload).map_err(|e| PeerManagerError::MalformedPayload {
        kind: kind.as_str(),
        reason: e.to_string(),
    })
}
