//! Domain Layer - Pure peer-management state with no I/O
//!
//! This module contains:
//! - Peer identities, records and wire candidates
//! - The connection table (pending + active connections)
//! - The node archive (round-robin candidate pool)
//! - Protocol messages and their named JSON form
//! - Invariant checks shared by the service and its tests

pub mod archive;
pub mod connection_table;
pub mod invariants;
pub mod messages;
/// Core domain types (entities, values, errors)
pub mod types;

pub use archive::*;
pub use connection_table::*;
pub use invariants::*;
pub use messages::*;
pub use types::*;
