//! # Connection Table
//!
//! Every relationship this node is attempting or has established.

mod table;

pub use table::ConnectionTable;
