//! Domain Port Interfaces
//!
//! Boundary contracts implemented outside the domain crate:
//!
//! - **handler** - the pluggable request handler behind every connection
//! - **telemetry** - per-request tracing injected into the connection server

/// Request handler port
pub mod handler;
/// Request tracing port
pub mod telemetry;

pub use handler::{Handler, HandlerResult, RequestContext};
pub use telemetry::{NoopTracer, RequestSpan, RequestTracer};
