//! Standard stream duplex adapter
//!
//! Presents the process standard input and output as one closable stream.
//! Closing closes the input first; only when that succeeds is the output
//! flushed and shut down.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf, Stdin, Stdout};

use super::Transport;

/// Readable half of a duplex that can be closed on its own
pub trait InputStream: AsyncRead + Send + Unpin + 'static {
    /// Close the input; a closed input reads as end-of-stream
    fn close(&mut self) -> io::Result<()>;
}

/// Process standard input
///
/// Closing releases the handle; later reads return end-of-stream and a
/// second close is an error.
#[derive(Debug)]
pub struct StdinStream {
    inner: Option<Stdin>,
}

impl StdinStream {
    /// Wrap the process standard input
    pub fn new() -> Self {
        Self {
            inner: Some(tokio::io::stdin()),
        }
    }
}

impl Default for StdinStream {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncRead for StdinStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut().inner.as_mut() {
            Some(stdin) => Pin::new(stdin).poll_read(cx, buf),
            None => Poll::Ready(Ok(())),
        }
    }
}

impl InputStream for StdinStream {
    fn close(&mut self) -> io::Result<()> {
        match self.inner.take() {
            Some(_) => Ok(()),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "standard input already closed",
            )),
        }
    }
}

/// Standard input and output as one stream
#[derive(Debug)]
pub struct StdioDuplex<I = StdinStream, O = Stdout> {
    input: I,
    output: O,
}

impl StdioDuplex {
    /// Duplex over the process standard streams
    pub fn new() -> Self {
        Self::from_parts(StdinStream::new(), tokio::io::stdout())
    }
}

impl Default for StdioDuplex {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, O> StdioDuplex<I, O> {
    /// Duplex over an arbitrary input and output
    pub fn from_parts(input: I, output: O) -> Self {
        Self { input, output }
    }
}

impl<I: InputStream, O: Unpin> AsyncRead for StdioDuplex<I, O> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().input).poll_read(cx, buf)
    }
}

impl<I: Unpin, O: AsyncWrite + Unpin> AsyncWrite for StdioDuplex<I, O> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().output).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().output).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().output).poll_shutdown(cx)
    }
}

#[async_trait]
impl<I, O> Transport for StdioDuplex<I, O>
where
    I: InputStream,
    O: AsyncWrite + Send + Unpin + 'static,
{
    async fn close(&mut self) -> io::Result<()> {
        self.input.close()?;
        self.output.shutdown().await
    }
}
