//! TCP transport
//!
//! One listener, accepted from a single task. Every accepted socket becomes
//! an independent [`Connection`]; a failing connection never affects its
//! siblings or the accept loop.

use tokio::net::TcpListener;
use tracing::info;

use langserver_domain::error::{Error, Result};
use langserver_infrastructure::address::normalize_address;

use crate::connection::{Connection, ServeContext, next_connection_id};

/// Bind the listener; `:port` listens on every interface
pub async fn bind_listener(address: &str) -> Result<TcpListener> {
    let normalized = normalize_address(address);
    let listener = TcpListener::bind(normalized.as_str())
        .await
        .map_err(|source| Error::bind(address, source))?;

    if let Ok(local) = listener.local_addr() {
        info!(address = %local, "listening for TCP connections");
    }
    Ok(listener)
}

/// Accept and serve connections until accepting fails
///
/// Only returns on an accept error.
pub async fn serve_tcp(listener: TcpListener, ctx: ServeContext) -> Result<()> {
    loop {
        let (stream, peer) = listener.accept().await.map_err(Error::accept)?;
        let id = next_connection_id();
        info!(connection = %id, %peer, "connection accepted");

        // The connection reports its own termination; nobody waits on it.
        drop(Connection::spawn(id, stream, ctx.clone()));
    }
}
