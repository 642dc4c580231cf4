//! JSON-RPC 2.0 message types
//!
//! Wire-neutral message model shared by the framing codecs and the
//! dispatch layer. Framing (headers, delimiters) is a codec concern.

use std::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::constants::{
    JSONRPC_INTERNAL_ERROR, JSONRPC_INVALID_REQUEST, JSONRPC_METHOD_NOT_FOUND,
    JSONRPC_PARSE_ERROR, JSONRPC_VERSION,
};

/// The `"jsonrpc": "2.0"` member
///
/// Always serialized as `"2.0"`; any value is tolerated on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Version;

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(JSONRPC_VERSION)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Version)
    }
}

/// Request identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric id
    Number(i64),
    /// String id
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// Request or notification (no `id`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// JSON-RPC version
    #[serde(default)]
    pub jsonrpc: Version,
    /// Request ID, absent for notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Request {
    /// Create a request that expects a response
    pub fn new<S: Into<String>>(id: RequestId, method: S, params: Option<Value>) -> Self {
        Self {
            jsonrpc: Version,
            id: Some(id),
            method: method.into(),
            params,
        }
    }

    /// Create a notification
    pub fn notification<S: Into<String>>(method: S, params: Option<Value>) -> Self {
        Self {
            jsonrpc: Version,
            id: None,
            method: method.into(),
            params,
        }
    }

    /// Notifications never receive a response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Structured error carried in a response
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message} (code {code})")]
pub struct ResponseError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ResponseError {
    /// Create an error with an arbitrary code
    pub fn new<S: Into<String>>(code: i32, message: S) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Payload was not valid JSON
    pub fn parse_error<S: Into<String>>(message: S) -> Self {
        Self::new(JSONRPC_PARSE_ERROR, message)
    }

    /// Payload was JSON but not a JSON-RPC message
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::new(JSONRPC_INVALID_REQUEST, message)
    }

    /// No handler for the method
    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            JSONRPC_METHOD_NOT_FOUND,
            format!("method not found: {method}"),
        )
    }

    /// Handler failure not attributable to the client
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::new(JSONRPC_INTERNAL_ERROR, message)
    }
}

/// Response to a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// JSON-RPC version
    #[serde(default)]
    pub jsonrpc: Version,
    /// ID of the answered request; `null` when it could not be determined
    #[serde(default)]
    pub id: Option<RequestId>,
    /// Response result (if successful)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error (if failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl Response {
    /// Create a success response
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: Version,
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn failure(id: Option<RequestId>, error: ResponseError) -> Self {
        Self {
            jsonrpc: Version,
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Whether this response carries an error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Any JSON-RPC message travelling on a connection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    /// Request or notification
    Request(Request),
    /// Response
    Response(Response),
}

impl Message {
    /// Decode a message from a frame body
    ///
    /// Returns the error response the peer should receive when the body is
    /// not JSON (`-32700`) or not a JSON-RPC message (`-32600`).
    pub fn parse(body: &[u8]) -> Result<Self, ResponseError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ResponseError::parse_error(format!("parse error: {e}")))?;
        Self::from_value(value)
    }

    /// Classify an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, ResponseError> {
        let Some(object) = value.as_object() else {
            return Err(ResponseError::invalid_request(
                "invalid request: expected a JSON object",
            ));
        };

        if object.contains_key("method") {
            return serde_json::from_value(value)
                .map(Message::Request)
                .map_err(|e| ResponseError::invalid_request(format!("invalid request: {e}")));
        }

        if object.contains_key("result") || object.contains_key("error") {
            return serde_json::from_value(value)
                .map(Message::Response)
                .map_err(|e| ResponseError::invalid_request(format!("invalid response: {e}")));
        }

        Err(ResponseError::invalid_request(
            "invalid request: missing method, result or error",
        ))
    }

    /// Serialize to a JSON body
    pub fn to_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl From<Request> for Message {
    fn from(request: Request) -> Self {
        Self::Request(request)
    }
}

impl From<Response> for Message {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}
