//! Validated startup configuration
//!
//! These values are produced once by the configuration loader and never
//! change afterwards. Every enum here is closed: unknown spellings are
//! configuration errors, not fallbacks.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TCP_ADDRESS;
use crate::error::{Error, Result};

/// How clients reach the server
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// One connection over the process standard streams
    #[default]
    Stdio,
    /// Many connections accepted from a TCP listener
    Tcp,
}

impl TransportMode {
    /// Canonical lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Tcp => "tcp",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "stdio" => Ok(Self::Stdio),
            "tcp" => Ok(Self::Tcp),
            other => Err(Error::invalid_mode(other)),
        }
    }
}

/// Message framing used on the byte stream
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Framing {
    /// `Content-Length` header framing
    #[default]
    Header,
    /// Newline-delimited JSON
    Line,
}

impl FromStr for Framing {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "header" => Ok(Self::Header),
            "line" => Ok(Self::Line),
            other => Err(Error::config(format!(
                "invalid framing {other:?}; use header or line"
            ))),
        }
    }
}

/// Console and file log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only
    Quiet,
    /// Informational lifecycle messages
    #[default]
    Normal,
    /// Debug output including per-message traces
    Verbose,
}

impl Verbosity {
    /// Resolve the verbosity flags; both together is an error
    pub fn from_flags(verbose: bool, quiet: bool) -> Result<Self> {
        match (verbose, quiet) {
            (true, true) => Err(Error::conflicting_flags("verbose", "quiet")),
            (true, false) => Ok(Self::Verbose),
            (false, true) => Ok(Self::Quiet),
            (false, false) => Ok(Self::Normal),
        }
    }

    /// Default `EnvFilter` directive for this verbosity
    pub fn filter_directive(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "info",
            Self::Verbose => "debug",
        }
    }
}

/// Distributed tracing settings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TracingSettings {
    /// Access token; `None` leaves the no-op tracer in place
    pub token: Option<String>,
    /// Collector endpoint for span export
    pub endpoint: String,
}

impl TracingSettings {
    /// Tracing disabled
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether a token is configured
    pub fn is_enabled(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }
}

/// Validated startup configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Selected transport
    pub mode: TransportMode,
    /// TCP listen address, only used in TCP mode
    pub address: String,
    /// Diagnostics endpoint bind address
    pub profiler_address: Option<String>,
    /// Log file duplicated from the console output
    pub log_file: Option<PathBuf>,
    /// Distributed tracing settings
    pub tracing: TracingSettings,
    /// Log verbosity
    pub verbosity: Verbosity,
    /// Message framing
    pub framing: Framing,
    /// Emit log lines as JSON
    pub json_logs: bool,
}

impl Configuration {
    /// Stdio configuration with every optional service disabled
    pub fn stdio() -> Self {
        Self {
            mode: TransportMode::Stdio,
            address: DEFAULT_TCP_ADDRESS.to_string(),
            profiler_address: None,
            log_file: None,
            tracing: TracingSettings::disabled(),
            verbosity: Verbosity::default(),
            framing: Framing::default(),
            json_logs: false,
        }
    }

    /// TCP configuration listening on `address`
    pub fn tcp<S: Into<String>>(address: S) -> Self {
        Self {
            mode: TransportMode::Tcp,
            address: address.into(),
            ..Self::stdio()
        }
    }

    /// Set the diagnostics endpoint address
    pub fn with_profiler<S: Into<String>>(mut self, address: S) -> Self {
        self.profiler_address = Some(address.into());
        self
    }

    /// Set the log file path
    pub fn with_log_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Set the tracing settings
    pub fn with_tracing(mut self, tracing: TracingSettings) -> Self {
        self.tracing = tracing;
        self
    }

    /// Set the framing
    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }
}
