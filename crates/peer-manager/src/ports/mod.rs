//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** the API the host calls into
//! - **Driven Ports (Outbound):** the services the host provides

pub mod inbound;
pub mod outbound;

pub use inbound::PeerManagerApi;
pub use outbound::{ConfigProvider, MessageSink, TimeSource, TimerHandle, UpstreamHandler};
