//! Server layer constants

// ============================================================================
// FRAMING CONSTANTS
// ============================================================================

/// Header announcing the body length
pub const CONTENT_LENGTH_HEADER: &str = "Content-Length";

/// Separator between the header section and the body
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Largest header section accepted before the frame is rejected
pub const MAX_HEADER_LENGTH: usize = 8 * 1024;

// ============================================================================
// CONNECTION CONSTANTS
// ============================================================================

/// Responses a connection may have queued or in flight before it stops
/// reading requests
pub const RESPONSE_QUEUE_CAPACITY: usize = 64;

// ============================================================================
// BASELINE HANDLER CONSTANTS
// ============================================================================

/// Server name reported in the `initialize` result
pub const SERVER_NAME: &str = "langserver";

/// Server version reported in the `initialize` result
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
