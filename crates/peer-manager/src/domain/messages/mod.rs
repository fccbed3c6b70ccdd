//! # Protocol Messages
//!
//! Typed control messages plus the named JSON form hosts exchange:
//!
//! | Name | Payload |
//! |------|---------|
//! | `connect` | `{}` |
//! | `accept` | `{}` |
//! | `reject` | `[PeerCandidate...]` |
//! | `disconnect` | `{}` |
//! | `peerlist` | `[PeerCandidate...]` |
//! | `getpeers` | `{}` |
//! | `__peermsg` | `{name, obj}` |

mod kind;
mod message;

pub use kind::MessageKind;
pub use message::{ApplicationMessage, Envelope, ProtocolMessage};
