//! # Peer Manager
//!
//! Connection lifecycle and transitive peer discovery for one node of a
//! decentralized network.
//!
//! Each node keeps a small set of pending and active connections plus an
//! archive of known-but-unconnected peers. A periodic discovery tick pulls
//! candidates from the archive round-robin and asks a random active peer for
//! more, until the connection quota is reached. Peers at capacity refuse new
//! connections but hand over their own archive, so knowledge of the network
//! spreads with every rejection.
//!
//! ## Lean Core
//!
//! The core library (domain, ports, service) only needs logging, errors,
//! serialization and randomness. Integrations are feature-gated:
//!
//! - `config` - TOML config files (toml)
//! - `runtime` - Tokio node driver over an in-memory network (tokio, parking_lot)
//! - `test-utils` - Recording fakes and a deterministic multi-node simulator
//!
//! ## Architecture
//!
//! - **Domain Layer:** Connection table, node archive, protocol messages
//! - **Ports Layer:** `PeerManagerApi` in, `MessageSink`/`TimeSource`/`UpstreamHandler` out
//! - **Service Layer:** `PeerManager`, the per-node state machine
//! - **Adapters Layer:** Concrete implementations
//!
//! ## Example
//!
//! ```rust
//! use peer_manager::adapters::SystemTimeSource;
//! use peer_manager::{
//!     ApplicationMessage, MessageSink, PeerId, PeerManager, PeerManagerConfig,
//!     ProtocolMessage, TransportError, UpstreamHandler,
//! };
//!
//! struct Outbox;
//! impl MessageSink for Outbox {
//!     fn send(&self, _to: PeerId, _msg: ProtocolMessage) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! struct App;
//! impl UpstreamHandler for App {
//!     fn on_peer_connected(&self, _peer: PeerId) {}
//!     fn on_application_message(&self, _from: PeerId, _msg: ApplicationMessage) {}
//! }
//!
//! let mut manager = PeerManager::new(
//!     PeerId::new(42),
//!     PeerManagerConfig::default(),
//!     Box::new(Outbox),
//!     Box::new(App),
//!     Box::new(SystemTimeSource::new()),
//! )
//! .unwrap();
//!
//! // First tick connects to the bootstrap seed.
//! manager.discovery_tick();
//! assert_eq!(manager.stats().pending, 1);
//!
//! // The seed accepts.
//! manager.handle_message(PeerId::new(0), ProtocolMessage::Accept);
//! assert!(manager.is_active(&PeerId::new(0)));
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod domain;
pub mod ports;
pub mod service;

// =============================================================================
// ADAPTERS
// =============================================================================

/// Adapters for external integrations.
/// `runtime` and `TomlConfigProvider` require their features.
pub mod adapters;

/// Test utilities (ManualClock, RecordingSink, SimNetwork)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// CORE RE-EXPORTS
// =============================================================================

// Domain entities
pub use domain::{
    ApplicationMessage, ConnectionTable, Disposition, Envelope, IgnoreReason, MessageKind,
    NodeArchive, PeerCandidate, PeerId, PeerManagerConfig, PeerManagerError, PeerManagerStats,
    PeerRecord, ProtocolMessage, TickOutcome, Timestamp, TransportError, UpstreamEvent,
};

// Invariant checks
pub use domain::{
    invariant_archive_unique, invariant_count_consistency, invariant_partition,
    InvariantViolation,
};

// Port traits
pub use ports::{
    ConfigProvider, MessageSink, PeerManagerApi, TimeSource, TimerHandle, UpstreamHandler,
};

// Service
pub use service::PeerManager;
