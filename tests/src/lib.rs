//! # Peer Manager Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── convergence.rs   # Swarms discovering each other from one seed
//!     ├── faults.rs        # Loss, reordering, duplication, churn
//!     └── runtime.rs       # Tokio node tasks over the in-memory network
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p peer-manager-tests
//!
//! # By category
//! cargo test -p peer-manager-tests integration::faults::
//! ```

#![allow(dead_code)]

pub mod integration;
