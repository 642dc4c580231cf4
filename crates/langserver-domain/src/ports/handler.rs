//! Request handler port
//!
//! The connection server decodes messages and hands each request to a
//! `Handler`. What the handler does with it (analysis, hover, definitions)
//! is outside this crate.

use async_trait::async_trait;
use serde_json::Value;

use crate::value_objects::{ConnectionId, Request, ResponseError};

/// Outcome of handling one request
pub type HandlerResult = Result<Value, ResponseError>;

/// Per-request context supplied by the connection server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// Connection the request arrived on
    pub connection_id: ConnectionId,
}

/// Pluggable JSON-RPC request handler
///
/// Called concurrently for overlapping requests on the same connection and
/// across connections. The result of a notification is discarded.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle one request or notification
    async fn handle(&self, ctx: &RequestContext, request: Request) -> HandlerResult;
}
