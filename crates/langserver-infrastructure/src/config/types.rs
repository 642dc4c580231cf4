//! Raw configuration types
//!
//! Every field is a plain string or flag exactly as a user typed it.
//! Interpretation happens in [`validate_config`](super::validate_config).

use serde::{Deserialize, Serialize};

use langserver_domain::constants::{DEFAULT_FRAMING, DEFAULT_MODE, DEFAULT_TCP_ADDRESS};

use crate::constants::DEFAULT_TRACING_ENDPOINT;

/// Unvalidated startup configuration
///
/// Keys match the TOML file and the `LANGSERVER_*` environment variables:
///
/// ```toml
/// mode = "tcp"
/// addr = "127.0.0.1:2088"
/// prof_http = ":6060"
/// log_file = "/tmp/langserver.log"
/// framing = "header"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Transport mode (`stdio` or `tcp`)
    pub mode: String,
    /// TCP listen address
    pub addr: String,
    /// Diagnostics endpoint address; empty disables it
    pub prof_http: String,
    /// Log file path; empty disables file logging
    pub log_file: String,
    /// Debug-level logging
    pub verbose: bool,
    /// Warning-level logging
    pub quiet: bool,
    /// Message framing (`header` or `line`)
    pub framing: String,
    /// JSON log lines
    pub log_json: bool,
    /// Tracing access token; empty disables tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracing_token: Option<String>,
    /// Trace collector endpoint
    pub tracing_endpoint: String,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            mode: DEFAULT_MODE.to_string(),
            addr: DEFAULT_TCP_ADDRESS.to_string(),
            prof_http: String::new(),
            log_file: String::new(),
            verbose: false,
            quiet: false,
            framing: DEFAULT_FRAMING.to_string(),
            log_json: false,
            tracing_token: None,
            tracing_endpoint: DEFAULT_TRACING_ENDPOINT.to_string(),
        }
    }
}

/// Values supplied on the command line
///
/// Only fields that were actually given are serialized, so unset flags
/// never mask lower-priority sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prof_http: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_json: Option<bool>,
}
