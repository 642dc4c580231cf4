//! # langserver domain
//!
//! Core types for the langserver transport and lifecycle layer.
//!
//! ## Contents
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy and `Result` alias |
//! | [`constants`] | JSON-RPC codes and transport defaults |
//! | [`value_objects`] | Configuration, JSON-RPC messages, connection states |
//! | [`ports`] | `Handler` and `RequestTracer` contracts |

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{Handler, HandlerResult, NoopTracer, RequestContext, RequestSpan, RequestTracer};
pub use value_objects::{
    Configuration, ConnectionId, ConnectionState, Framing, Message, Request, RequestId, Response,
    ResponseError, TracingSettings, TransportMode, Verbosity,
};
