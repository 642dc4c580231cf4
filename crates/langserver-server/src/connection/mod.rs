//! Connection serving
//!
//! A [`Connection`] binds one transport to the dispatch layer:
//!
//! 1. the transport is split; a writer task owns the write half and sends
//!    every response handed to it over a bounded channel;
//! 2. the read loop decodes frames and dispatches each request on its own
//!    task, so overlapping requests are not serialized. A request expecting
//!    a response first reserves a slot in the channel, so a client that
//!    stops reading its responses eventually stops being read from;
//! 3. on end-of-stream in-flight requests finish, on a fatal error they are
//!    aborted; then the writer drains, the transport is closed, the terminal
//!    state is recorded and the disconnect signal fires.
//!
//! Slots are held from dispatch until the response is written. A handler
//! that waits on a later request of the same connection can therefore stall
//! the connection once every slot is taken.

mod dispatch;
pub mod signal;

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, warn};

use langserver_domain::constants::MAX_FRAME_LENGTH;
use langserver_domain::ports::{Handler, RequestTracer};
use langserver_domain::value_objects::{
    ConnectionId, ConnectionState, Framing, Message, Response,
};
use langserver_infrastructure::metrics::ServerMetrics;

use crate::codec::{CodecError, Inbound, MessageCodec};
use crate::constants::RESPONSE_QUEUE_CAPACITY;
use crate::transport::Transport;

pub use signal::{Disconnect, DisconnectNotifier, DisconnectSignal, disconnect_pair};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a process-unique connection id
pub fn next_connection_id() -> ConnectionId {
    ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
}

/// Collaborators shared by every connection
#[derive(Clone)]
pub struct ServeContext {
    handler: Arc<dyn Handler>,
    tracer: Arc<dyn RequestTracer>,
    metrics: Arc<ServerMetrics>,
    framing: Framing,
    max_frame_length: usize,
    response_capacity: usize,
}

impl ServeContext {
    /// Create a context with the default frame limit
    pub fn new(
        handler: Arc<dyn Handler>,
        tracer: Arc<dyn RequestTracer>,
        metrics: Arc<ServerMetrics>,
        framing: Framing,
    ) -> Self {
        Self {
            handler,
            tracer,
            metrics,
            framing,
            max_frame_length: MAX_FRAME_LENGTH,
            response_capacity: RESPONSE_QUEUE_CAPACITY,
        }
    }

    /// Override the frame limit
    pub fn with_max_frame_length(mut self, max_frame_length: usize) -> Self {
        self.max_frame_length = max_frame_length;
        self
    }

    /// Override how many responses may be pending per connection
    ///
    /// Zero is raised to one.
    pub fn with_response_capacity(mut self, capacity: usize) -> Self {
        self.response_capacity = capacity.max(1);
        self
    }

    /// Shared metrics
    pub fn metrics(&self) -> &Arc<ServerMetrics> {
        &self.metrics
    }

    fn codec(&self) -> MessageCodec {
        MessageCodec::new(self.framing, self.max_frame_length)
    }
}

/// Forward-only connection state
#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    fn new() -> Self {
        Self(AtomicU8::new(ConnectionState::Established as u8))
    }

    fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
            .unwrap_or(ConnectionState::ClosedOnError)
    }

    /// Move to `next` if the transition is legal
    fn advance(&self, next: ConnectionState) -> bool {
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                let current = ConnectionState::from_u8(raw)?;
                current.can_advance_to(next).then_some(next as u8)
            })
            .is_ok()
    }
}

/// Handle to a connection served on its own task
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    state: Arc<StateCell>,
    signal: DisconnectSignal,
}

impl Connection {
    /// Start serving `transport` on a new task
    pub fn spawn<T: Transport>(id: ConnectionId, transport: T, ctx: ServeContext) -> Self {
        let state = Arc::new(StateCell::new());
        let (notifier, signal) = disconnect_pair();
        tokio::spawn(serve(id, transport, ctx, Arc::clone(&state), notifier));
        Self { id, state, signal }
    }

    /// Connection id
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Wait for the connection to terminate
    ///
    /// Returns immediately with the same outcome on later calls.
    pub async fn disconnected(&mut self) -> Disconnect {
        self.signal.wait().await
    }
}

type WriterOutcome<W> = (W, Result<(), CodecError>);

async fn write_loop<W>(
    id: ConnectionId,
    mut sink: FramedWrite<W, MessageCodec>,
    mut rx: mpsc::Receiver<Message>,
) -> WriterOutcome<W>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        if let Message::Response(response) = &message {
            debug!(
                connection = %id,
                id = ?response.id,
                error = response.error.is_some(),
                "sending response"
            );
        }
        if let Err(e) = sink.send(message).await {
            return (sink.into_inner(), Err(e));
        }
    }
    (sink.into_inner(), Ok(()))
}

async fn serve<T: Transport>(
    id: ConnectionId,
    transport: T,
    ctx: ServeContext,
    state: Arc<StateCell>,
    notifier: DisconnectNotifier,
) {
    let (read_half, write_half) = tokio::io::split(transport);
    let mut reader = FramedRead::new(read_half, ctx.codec());
    let (tx, rx) = mpsc::channel::<Message>(ctx.response_capacity);
    let mut writer = tokio::spawn(write_loop(id, FramedWrite::new(write_half, ctx.codec()), rx));
    let mut writer_outcome = None;
    let mut requests = JoinSet::new();

    state.advance(ConnectionState::Serving);
    ctx.metrics.connection_opened();
    debug!(connection = %id, framing = ?ctx.framing, "connection serving");

    let read_result: Result<(), String> = loop {
        tokio::select! {
            frame = reader.next() => match frame {
                None => break Ok(()),
                Some(Ok(Inbound::Message(Message::Request(request)))) => {
                    let permit = if request.id.is_some() {
                        match tx.clone().reserve_owned().await {
                            Ok(permit) => Some(permit),
                            Err(_) => break Err("response writer stopped".to_string()),
                        }
                    } else {
                        None
                    };
                    dispatch::spawn_request(&mut requests, &ctx, id, request, permit);
                }
                Some(Ok(Inbound::Message(Message::Response(response)))) => {
                    debug!(connection = %id, id = ?response.id, "ignoring inbound response");
                }
                Some(Ok(Inbound::Invalid(error))) => {
                    warn!(connection = %id, code = error.code, error = %error.message, "rejected message");
                    if tx.send(Response::failure(None, error).into()).await.is_err() {
                        break Err("response writer stopped".to_string());
                    }
                }
                Some(Err(e)) => break Err(e.to_string()),
            },
            Some(_) = requests.join_next(), if !requests.is_empty() => {}
            outcome = &mut writer => {
                let failure = match &outcome {
                    Ok((_, Err(e))) => e.to_string(),
                    Ok((_, Ok(()))) => "response writer stopped".to_string(),
                    Err(e) => format!("response writer failed: {e}"),
                };
                writer_outcome = Some(outcome);
                break Err(failure);
            }
        }
    };

    if read_result.is_ok() {
        while requests.join_next().await.is_some() {}
    } else {
        requests.shutdown().await;
    }
    drop(tx);

    let writer_outcome = match writer_outcome {
        Some(outcome) => outcome,
        None => writer.await,
    };
    let (write_half, write_result) = match writer_outcome {
        Ok((write_half, result)) => (Some(write_half), result.map_err(|e| e.to_string())),
        Err(e) => (None, Err(format!("response writer failed: {e}"))),
    };

    if let Some(write_half) = write_half {
        let mut transport = reader.into_inner().unsplit(write_half);
        if let Err(e) = transport.close().await {
            debug!(connection = %id, error = %e, "transport close failed");
        }
    }

    let outcome = match read_result.and(write_result) {
        Ok(()) => Disconnect::normal(),
        Err(e) => Disconnect::failed(e),
    };
    state.advance(outcome.state);
    ctx.metrics.connection_closed();
    match &outcome.error {
        None => info!(connection = %id, "connection closed"),
        Some(error) => warn!(connection = %id, %error, "connection closed on error"),
    }
    notifier.fire(outcome);
}
