//! Transport layer
//!
//! A [`Transport`] is any closable duplex byte stream a connection can be
//! served over.
//!
//! | Module | Mode | Connections |
//! |--------|------|-------------|
//! | [`stdio`] | `stdio` | exactly one, over stdin/stdout |
//! | [`tcp`] | `tcp` | many, one per accepted socket |

pub mod stdio;
pub mod tcp;

use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, DuplexStream};
use tokio::net::TcpStream;

pub use stdio::{InputStream, StdinStream, StdioDuplex};
pub use tcp::{bind_listener, serve_tcp};

/// Closable duplex byte stream
#[async_trait]
pub trait Transport: AsyncRead + AsyncWrite + Send + Unpin + 'static {
    /// Close the stream once serving is over
    async fn close(&mut self) -> io::Result<()> {
        self.shutdown().await
    }
}

#[async_trait]
impl Transport for TcpStream {}

#[async_trait]
impl Transport for DuplexStream {}

#[async_trait]
impl Transport for Box<dyn Transport> {
    async fn close(&mut self) -> io::Result<()> {
        (**self).close().await
    }
}
