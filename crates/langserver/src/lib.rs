//! # langserver
//!
//! Transport and lifecycle front end for a language server: JSON-RPC over
//! stdin/stdout or TCP, with optional log file, diagnostics endpoint and
//! distributed tracing.
//!
//! ## Example
//!
//! ```no_run
//! use langserver::domain::value_objects::Configuration;
//!
//! # async fn serve() -> langserver::domain::error::Result<()> {
//! langserver::run(Configuration::tcp("127.0.0.1:2088")).await
//! # }
//! ```
//!
//! ## Architecture
//!
//! - `domain` - configuration values, JSON-RPC model, ports, errors
//! - `infrastructure` - config loading, logging, tracing, metrics, profiler
//! - `server` - framing codecs, connections, transports, lifecycle
//! - `cli` - command-line flags and their mapping onto configuration

pub mod cli;

/// Domain layer - core types and contracts
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use langserver_domain::*;
}

/// Infrastructure layer - configuration and observability
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use langserver_infrastructure::*;
}

/// Server layer - transports and connection lifecycle
///
/// Re-exports from the server crate for convenience
pub mod server {
    pub use langserver_server::*;
}

pub use cli::{Cli, normalize_args};
pub use server::{LanguageServer, LanguageServerBuilder, exit_status, run};
