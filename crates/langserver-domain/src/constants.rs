//! Domain layer constants
//!
//! Protocol-level values shared by the server and infrastructure crates.
//! Deployment defaults (file names, env prefixes) live in
//! `langserver_infrastructure::constants`.

// ============================================================================
// JSON-RPC PROTOCOL CONSTANTS
// ============================================================================

/// JSON-RPC protocol version string
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC Parse error code
pub const JSONRPC_PARSE_ERROR: i32 = -32700;

/// JSON-RPC Invalid request error code
pub const JSONRPC_INVALID_REQUEST: i32 = -32600;

/// JSON-RPC Method not found error code
pub const JSONRPC_METHOD_NOT_FOUND: i32 = -32601;

/// JSON-RPC Internal error code
pub const JSONRPC_INTERNAL_ERROR: i32 = -32603;

// ============================================================================
// TRANSPORT DEFAULTS
// ============================================================================

/// Default transport mode name
pub const DEFAULT_MODE: &str = "stdio";

/// Default TCP listen address (all interfaces)
pub const DEFAULT_TCP_ADDRESS: &str = ":2088";

/// Default framing name
pub const DEFAULT_FRAMING: &str = "header";

/// Largest frame a codec accepts before failing the connection (64 MiB)
pub const MAX_FRAME_LENGTH: usize = 64 * 1024 * 1024;

// ============================================================================
// TRACING CONSTANTS
// ============================================================================

/// Environment variable holding the tracing access token
pub const TRACING_TOKEN_ENV: &str = "LIGHTSTEP_ACCESS_TOKEN";
