//! Value objects
//!
//! Immutable values with no identity beyond their contents: startup
//! configuration, JSON-RPC messages and connection bookkeeping.

/// Validated startup configuration
pub mod config;
/// Connection identity and lifecycle states
pub mod connection;
/// JSON-RPC 2.0 message model
pub mod jsonrpc;

pub use config::{Configuration, Framing, TracingSettings, TransportMode, Verbosity};
pub use connection::{ConnectionId, ConnectionState};
pub use jsonrpc::{Message, Request, RequestId, Response, ResponseError, Version};
