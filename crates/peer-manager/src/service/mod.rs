//! # Peer Manager Service
//!
//! The per-node state machine implementing the `PeerManagerApi` port.
//!
//! It wraps the domain `ConnectionTable` and `NodeArchive` together with the
//! outbound ports, and exposes the discovery tick, the inbound protocol
//! handlers, and local connection commands.

// Semantic submodules
mod api;
mod broadcast;
mod connection;
mod core;
mod discovery;
mod handlers;

// Re-export public API
pub use core::PeerManager;
