//! Log fan-out writer
//!
//! A [`MakeWriter`] that duplicates every log line to a fixed set of sinks.
//! Each writer handle buffers one line and commits it to all sinks while
//! holding a single lock, so lines from concurrent threads never interleave.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

/// One destination of the fan-out writer
pub struct Sink {
    writer: Box<dyn Write + Send>,
    releasable: bool,
}

impl Sink {
    /// A sink that lives as long as the process (the console)
    pub fn permanent<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
            releasable: false,
        }
    }

    /// A sink closed when the writer is released (a log file)
    pub fn releasable<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
            releasable: true,
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("releasable", &self.releasable)
            .finish_non_exhaustive()
    }
}

/// Thread-safe writer duplicating bytes to every sink
///
/// Cloning shares the same sinks.
#[derive(Clone, Debug)]
pub struct FanoutWriter {
    sinks: Arc<Mutex<Vec<Sink>>>,
}

impl FanoutWriter {
    /// Create a writer over a fixed set of sinks
    pub fn new(sinks: Vec<Sink>) -> Self {
        Self {
            sinks: Arc::new(Mutex::new(sinks)),
        }
    }

    /// Number of sinks currently attached
    pub fn sink_count(&self) -> usize {
        self.lock().len()
    }

    /// Write `bytes` to every sink as one unit
    ///
    /// A failing sink is skipped; the others still receive the bytes.
    pub fn commit(&self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let mut sinks = self.lock();
        for sink in sinks.iter_mut() {
            if sink.writer.write_all(bytes).is_ok() {
                let _ = sink.writer.flush();
            }
        }
    }

    /// Flush and drop every releasable sink
    ///
    /// Returns the number of sinks released; later calls release nothing.
    pub fn release(&self) -> usize {
        let mut sinks = self.lock();
        let before = sinks.len();
        sinks.retain_mut(|sink| {
            if sink.releasable {
                let _ = sink.writer.flush();
            }
            !sink.releasable
        });
        before - sinks.len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Sink>> {
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<'a> MakeWriter<'a> for FanoutWriter {
    type Writer = LineBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        LineBuffer {
            target: self.clone(),
            buffer: Vec::new(),
        }
    }
}

/// Per-event buffer handed out by [`FanoutWriter`]
///
/// Bytes are committed on flush and on drop.
#[derive(Debug)]
pub struct LineBuffer {
    target: FanoutWriter,
    buffer: Vec<u8>,
}

impl Write for LineBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.target.commit(&self.buffer);
        self.buffer.clear();
        Ok(())
    }
}

impl Drop for LineBuffer {
    fn drop(&mut self) {
        self.target.commit(&self.buffer);
    }
}
