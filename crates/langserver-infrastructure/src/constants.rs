//! Infrastructure layer constants
//!
//! Deployment defaults. Protocol constants live in
//! `langserver_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "langserver.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "langserver";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "LANGSERVER";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "LANGSERVER_LOG";

// ============================================================================
// TRACING CONSTANTS
// ============================================================================

/// Default OTLP/HTTP trace collector endpoint
pub const DEFAULT_TRACING_ENDPOINT: &str = "https://ingest.lightstep.com/traces/otlp/v0.9";

/// Header carrying the tracing access token
pub const TRACING_TOKEN_HEADER: &str = "lightstep-access-token";

/// Service name reported on exported spans
pub const TRACING_SERVICE_NAME: &str = "langserver";

/// Instrumentation scope name for request spans
pub const TRACER_NAME: &str = "langserver.rpc";

// ============================================================================
// DIAGNOSTICS CONSTANTS
// ============================================================================

/// Service name reported by the diagnostics endpoint
pub const DIAGNOSTICS_SERVICE_NAME: &str = "langserver";

/// Prefix for exported prometheus metric names
pub const METRICS_NAMESPACE: &str = "langserver";
