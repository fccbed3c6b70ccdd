//! # Adapters
//!
//! Concrete implementations of the outbound ports.
//!
//! ## Adapters Provided
//!
//! - `SystemTimeSource` - Wall-clock time in milliseconds
//! - `StaticConfigProvider` - Config built in code
//! - `TomlConfigProvider` - Config file loading (requires "config" feature)
//! - `runtime` - Tokio node driver over an in-memory network (requires "runtime" feature)

pub mod config;
pub mod time;

#[cfg(feature = "runtime")]
pub mod runtime;

pub use config::StaticConfigProvider;
#[cfg(feature = "config")]
pub use config::{ConfigError, TomlConfigProvider};
pub use time::SystemTimeSource;
