//! Baseline request handler
//!
//! Answers the lifecycle requests every language client sends so the
//! transport can be exercised end to end without an analysis backend.

use async_trait::async_trait;
use serde_json::{Value, json};

use langserver_domain::ports::{Handler, HandlerResult, RequestContext};
use langserver_domain::value_objects::{Request, ResponseError};

use crate::constants::{SERVER_NAME, SERVER_VERSION};

/// Handler for `initialize`, `shutdown` and lifecycle notifications
#[derive(Debug, Clone)]
pub struct BaselineHandler {
    name: String,
    version: String,
}

impl BaselineHandler {
    /// Handler reporting the given server identity
    pub fn new<N: Into<String>, V: Into<String>>(name: N, version: V) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for BaselineHandler {
    fn default() -> Self {
        Self::new(SERVER_NAME, SERVER_VERSION)
    }
}

#[async_trait]
impl Handler for BaselineHandler {
    async fn handle(&self, _ctx: &RequestContext, request: Request) -> HandlerResult {
        match request.method.as_str() {
            "initialize" => Ok(json!({
                "capabilities": {},
                "serverInfo": {
                    "name": self.name,
                    "version": self.version,
                },
            })),
            "shutdown" | "initialized" | "exit" | "$/cancelRequest" => Ok(Value::Null),
            other => Err(ResponseError::method_not_found(other)),
        }
    }
}
