//! # langserver Server
//!
//! Transport and lifecycle layer of a language-server front end: decides
//! how a client connects, frames JSON-RPC messages over that connection,
//! hands requests to a pluggable handler and manages the process lifetime
//! until the connection terminates.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use langserver_domain::Configuration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     langserver_server::run(Configuration::stdio()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`LanguageServer`] | Configured server, ready to run |
//! | [`LanguageServerBuilder`] | Builder injecting handler, tracer, metrics and streams |
//! | [`Connection`] | One served connection with its disconnect signal |
//! | [`StdioDuplex`] | stdin/stdout as one closable stream |
//! | [`MessageCodec`] | `Content-Length` or newline framing |

pub mod builder;
pub mod codec;
pub mod connection;
pub mod constants;
pub mod handlers;
pub mod init;
pub mod transport;

pub use builder::{BuilderError, LanguageServerBuilder};
pub use codec::{CodecError, Inbound, MessageCodec};
pub use connection::{Connection, Disconnect, ServeContext};
pub use handlers::BaselineHandler;
pub use init::{LanguageServer, exit_status, run};
pub use transport::{StdioDuplex, Transport};
