//! Per-request dispatch
//!
//! Each request runs on its own task: metrics and a tracing span are
//! opened, the handler is invoked with panics caught, and the response (if
//! the request was not a notification) is written into the writer slot
//! reserved for it.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::sync::mpsc::OwnedPermit;
use tokio::task::JoinSet;
use tracing::{debug, error};

use langserver_domain::ports::{HandlerResult, RequestContext};
use langserver_domain::value_objects::{ConnectionId, Message, Request, Response, ResponseError};

use super::ServeContext;

pub(super) fn spawn_request(
    requests: &mut JoinSet<()>,
    ctx: &ServeContext,
    connection_id: ConnectionId,
    request: Request,
    permit: Option<OwnedPermit<Message>>,
) {
    let ctx = ctx.clone();
    requests.spawn(async move { handle_request(ctx, connection_id, request, permit).await });
}

async fn handle_request(
    ctx: ServeContext,
    connection_id: ConnectionId,
    request: Request,
    permit: Option<OwnedPermit<Message>>,
) {
    let method = request.method.clone();
    let id = request.id.clone();
    debug!(connection = %connection_id, %method, id = ?id, "dispatching request");

    ctx.metrics.request_started(&method);
    let mut span = ctx.tracer.start_request(&method, connection_id);
    let request_ctx = RequestContext { connection_id };

    let result: HandlerResult = AssertUnwindSafe(ctx.handler.handle(&request_ctx, request))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| {
            let reason = panic_message(panic.as_ref());
            error!(connection = %connection_id, %method, %reason, "request handler panicked");
            Err(ResponseError::internal(format!("internal error: {reason}")))
        });

    if let Err(e) = &result {
        span.record_error(e);
        ctx.metrics.request_failed(&method);
    }
    drop(span);

    let (Some(id), Some(permit)) = (id, permit) else {
        return;
    };
    let response = match result {
        Ok(value) => Response::success(id, value),
        Err(e) => Response::failure(Some(id), e),
    };
    permit.send(response.into());
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "handler panicked"
    }
}
