//! Error handling types

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for langserver
///
/// Variants follow the startup taxonomy: configuration errors are raised
/// before any resource exists, resource-acquisition errors after some may
/// exist. Per-connection and best-effort errors are contained where they
/// happen and never reach `main`.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (simple form)
    #[error("I/O error: {source}")]
    IoSimple {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Transport mode outside the recognized set
    #[error("invalid mode {mode:?}")]
    InvalidMode {
        /// The rejected mode value
        mode: String,
    },

    /// Two mutually exclusive flags were supplied together
    #[error("flags --{first} and --{second} are mutually exclusive")]
    ConflictingFlags {
        /// First flag name (without dashes)
        first: &'static str,
        /// Second flag name (without dashes)
        second: &'static str,
    },

    /// The log file could not be created
    #[error("cannot create log file {}: {source}", path.display())]
    LogFile {
        /// Requested log file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The TCP listener could not be bound
    #[error("cannot listen on {address}: {source}")]
    Bind {
        /// Requested listen address
        address: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The listener stopped accepting connections
    #[error("accept failed: {source}")]
    Accept {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Distributed tracing setup error
    #[error("Tracing error: {message}")]
    Tracing {
        /// Description of the tracing error
        message: String,
    },

    /// Diagnostics endpoint error
    #[error("Profiler error: {message}")]
    Profiler {
        /// Description of the profiler error
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid mode error
    pub fn invalid_mode<S: Into<String>>(mode: S) -> Self {
        Self::InvalidMode { mode: mode.into() }
    }

    /// Create a conflicting flags error
    pub fn conflicting_flags(first: &'static str, second: &'static str) -> Self {
        Self::ConflictingFlags { first, second }
    }
}

// Resource and runtime error creation methods
impl Error {
    /// Create a log file error
    pub fn log_file<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::LogFile {
            path: path.into(),
            source,
        }
    }

    /// Create a listener bind error
    pub fn bind<S: Into<String>>(address: S, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    /// Create an accept error
    pub fn accept(source: std::io::Error) -> Self {
        Self::Accept { source }
    }

    /// Create a tracing error
    pub fn tracing<S: Into<String>>(message: S) -> Self {
        Self::Tracing {
            message: message.into(),
        }
    }

    /// Create a profiler error
    pub fn profiler<S: Into<String>>(message: S) -> Self {
        Self::Profiler {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Classification helpers
impl Error {
    /// Whether the error was raised while validating configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::InvalidMode { .. } | Self::ConflictingFlags { .. }
        )
    }
}
