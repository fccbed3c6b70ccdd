//! # Driving Ports (Inbound API)
//!
//! The API the host drives: timer ticks, inbound messages, and local
//! connection commands.

use serde_json::Value;

use crate::domain::{Disposition, PeerId, PeerManagerStats, ProtocolMessage, TickOutcome};

/// Primary API for interacting with a peer manager.
///
/// The host must serialize calls: no two methods run concurrently on the
/// same instance, which is why every mutating method takes `&mut self`.
///
/// # Example
///
/// ```rust,ignore
/// use peer_manager::ports::PeerManagerApi;
///
/// fn pump<T: PeerManagerApi>(api: &mut T, inbox: Vec<(PeerId, ProtocolMessage)>) {
///     for (from, message) in inbox {
///         api.handle_message(from, message);
///     }
///     api.discovery_tick();
/// }
/// ```
pub trait PeerManagerApi {
    /// Run one discovery tick.
    ///
    /// Returns [`TickOutcome::Stop`] once the connection quota is reached;
    /// the host should cancel its timer.
    fn discovery_tick(&mut self) -> TickOutcome;

    /// Feed one inbound message from `from`.
    ///
    /// Messages that do not fit the current relationship state are ignored.
    fn handle_message(&mut self, from: PeerId, message: ProtocolMessage) -> Disposition;

    /// Open a connection to `peer` (pending until accepted).
    fn connect(&mut self, peer: PeerId) -> Disposition;

    /// Forget a connection locally, returning the peer to the archive.
    fn disconnect(&mut self, peer: PeerId) -> Disposition;

    /// Tell `peer` we are leaving, then disconnect locally.
    fn drop_connection(&mut self, peer: PeerId) -> Disposition;

    /// Send an application message to every active peer.
    ///
    /// Returns the number of peers it was sent to.
    fn broadcast(&self, name: &str, obj: Value) -> usize;

    /// Current state snapshot.
    fn stats(&self) -> PeerManagerStats;
}
