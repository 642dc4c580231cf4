//! Listen address handling
//!
//! Addresses may use the `:port` shorthand, meaning every interface.

use std::io;
use std::net::SocketAddr;

/// Expand `:port` to `0.0.0.0:port`; other addresses are returned as given
pub fn normalize_address(address: &str) -> String {
    let address = address.trim();
    match address.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => address.to_string(),
    }
}

/// Resolve an address to the first socket address it names
pub async fn resolve_address(address: &str) -> io::Result<SocketAddr> {
    let normalized = normalize_address(address);
    tokio::net::lookup_host(normalized.as_str())
        .await?
        .next()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("address {address:?} resolved to nothing"),
            )
        })
}
