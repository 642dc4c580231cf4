//! Handlers with scripted behavior

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use langserver_domain::ports::{Handler, HandlerResult, RequestContext};
use langserver_domain::value_objects::{Request, ResponseError};
use serde_json::{Value, json};
use tokio::sync::Notify;

/// Panics on `explode`, echoes the method otherwise
pub struct PanickingHandler;

#[async_trait]
impl Handler for PanickingHandler {
    async fn handle(&self, _ctx: &RequestContext, request: Request) -> HandlerResult {
        if request.method == "explode" {
            panic!("handler blew up");
        }
        Ok(json!({ "method": request.method }))
    }
}

/// `block` waits until a later `release` request arrives
#[derive(Default)]
pub struct GatedHandler {
    gate: Arc<Notify>,
}

#[async_trait]
impl Handler for GatedHandler {
    async fn handle(&self, _ctx: &RequestContext, request: Request) -> HandlerResult {
        match request.method.as_str() {
            "block" => {
                self.gate.notified().await;
                Ok(json!("unblocked"))
            }
            "release" => {
                self.gate.notify_one();
                Ok(json!("released"))
            }
            other => Err(ResponseError::method_not_found(other)),
        }
    }
}

/// Sleeps before answering every request
pub struct SlowHandler(pub Duration);

#[async_trait]
impl Handler for SlowHandler {
    async fn handle(&self, _ctx: &RequestContext, _request: Request) -> HandlerResult {
        tokio::time::sleep(self.0).await;
        Ok(Value::Bool(true))
    }
}
