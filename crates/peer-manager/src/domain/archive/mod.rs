//! # Node Archive
//!
//! Known-but-unconnected peers, used both as a round-robin retry queue and
//! as a recency-ordered candidate pool.

mod node_archive;

pub use node_archive::NodeArchive;
