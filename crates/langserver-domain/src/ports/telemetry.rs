//! Request tracing port
//!
//! The connection server opens one span per dispatched request through an
//! injected `RequestTracer`, so it never touches global tracer state.

use crate::value_objects::{ConnectionId, ResponseError};

/// Span covering one request; ends when dropped
pub trait RequestSpan: Send {
    /// Mark the span as failed
    fn record_error(&mut self, error: &ResponseError);
}

/// Factory for request spans
pub trait RequestTracer: Send + Sync {
    /// Open a span for `method` on `connection`
    fn start_request(&self, method: &str, connection: ConnectionId) -> Box<dyn RequestSpan>;

    /// Whether spans are exported anywhere
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Tracer used when no tracing token is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

struct NoopSpan;

impl RequestSpan for NoopSpan {
    fn record_error(&mut self, _error: &ResponseError) {}
}

impl RequestTracer for NoopTracer {
    fn start_request(&self, _method: &str, _connection: ConnectionId) -> Box<dyn RequestSpan> {
        Box::new(NoopSpan)
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
