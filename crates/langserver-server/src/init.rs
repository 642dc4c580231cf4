//! Server lifecycle
//!
//! Startup runs in a fixed order so that a failure at any step leaves
//! nothing from the later steps behind:
//!
//! 1. logging (console plus optional file) with its release guard;
//! 2. metrics;
//! 3. the transport: the stdio duplex, or a bound TCP listener;
//! 4. side services: the detached profiler, then the tracer;
//! 5. serving until the stdio connection ends (whatever its outcome) or
//!    accepting fails;
//! 6. tracer flush, then log release on the way out.
//!
//! # Transport Modes
//!
//! - **Stdio**: one connection over stdin/stdout; the run ends with it and
//!   succeeds even when the connection closed on error
//! - **Tcp**: a listener serving concurrent connections until accept fails

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use langserver_domain::error::{Error, Result};
use langserver_domain::ports::{Handler, RequestTracer};
use langserver_domain::value_objects::{Configuration, TransportMode};
use langserver_infrastructure::logging::{LoggingSettings, init_logging};
use langserver_infrastructure::metrics::ServerMetrics;
use langserver_infrastructure::profiler::spawn_profiler;
use langserver_infrastructure::telemetry::{init_tracing, shutdown_tracing};

use crate::LanguageServerBuilder;
use crate::connection::{Connection, ServeContext, next_connection_id};
use crate::handlers::BaselineHandler;
use crate::transport::{StdioDuplex, Transport, bind_listener, serve_tcp};

/// Run the language server with the baseline handler
///
/// `configuration` must already be validated; see
/// `langserver_infrastructure::config::ConfigLoader`.
pub async fn run(configuration: Configuration) -> Result<()> {
    LanguageServerBuilder::new()
        .with_configuration(configuration)
        .with_handler(Arc::new(BaselineHandler::default()))
        .try_build()
        .map_err(|e| Error::internal(e.to_string()))?
        .run()
        .await
}

/// Process exit status for a run result
pub fn exit_status(result: &Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Configured language server, ready to run
pub struct LanguageServer {
    pub(crate) configuration: Configuration,
    pub(crate) handler: Arc<dyn Handler>,
    pub(crate) tracer: Option<Arc<dyn RequestTracer>>,
    pub(crate) metrics: Option<Arc<ServerMetrics>>,
    pub(crate) stdio_transport: Option<Box<dyn Transport>>,
}

/// Transport established before any side service starts
enum EstablishedTransport {
    Stdio(Box<dyn Transport>),
    Tcp(TcpListener),
}

impl LanguageServer {
    /// Validated configuration this server runs with
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Run until the stdio connection ends or the TCP accept loop fails
    pub async fn run(self) -> Result<()> {
        let Self {
            configuration,
            handler,
            tracer,
            metrics,
            stdio_transport,
        } = self;

        let _log_guard = init_logging(&LoggingSettings::from(&configuration))?;
        info!(
            mode = %configuration.mode,
            framing = ?configuration.framing,
            "starting language server"
        );

        let metrics = match metrics {
            Some(metrics) => metrics,
            None => Arc::new(ServerMetrics::new()?),
        };

        let transport = match establish_transport(&configuration, stdio_transport).await {
            Ok(transport) => transport,
            Err(e) => {
                error!(error = %e, "failed to establish transport");
                return Err(e);
            }
        };

        if let Some(address) = &configuration.profiler_address {
            spawn_profiler(address.clone(), Arc::clone(&metrics));
        }
        let tracer = tracer.unwrap_or_else(|| init_tracing(&configuration.tracing));
        let flush_tracer = tracer.is_enabled();

        let ctx = ServeContext::new(handler, tracer, metrics, configuration.framing);
        let result = start_transport(transport, ctx).await;

        if flush_tracer {
            if let Err(e) = tokio::task::spawn_blocking(shutdown_tracing).await {
                warn!(error = %e, "tracer shutdown task failed");
            }
        }
        match &result {
            Ok(()) => info!("language server stopped"),
            Err(e) => error!(error = %e, "language server stopped on error"),
        }
        result
    }
}

async fn establish_transport(
    configuration: &Configuration,
    stdio_transport: Option<Box<dyn Transport>>,
) -> Result<EstablishedTransport> {
    match configuration.mode {
        TransportMode::Stdio => Ok(EstablishedTransport::Stdio(
            stdio_transport.unwrap_or_else(|| Box::new(StdioDuplex::new())),
        )),
        TransportMode::Tcp => Ok(EstablishedTransport::Tcp(
            bind_listener(&configuration.address).await?,
        )),
    }
}

/// Serve on the established transport
async fn start_transport(transport: EstablishedTransport, ctx: ServeContext) -> Result<()> {
    match transport {
        EstablishedTransport::Stdio(stream) => {
            info!("serving over stdio");
            run_stdio_transport(stream, ctx).await
        }
        EstablishedTransport::Tcp(listener) => serve_tcp(listener, ctx).await,
    }
}

/// Serve the single stdio connection and wait for its disconnect
///
/// The connection outcome is contained here: a connection that closed on
/// error is logged and the run still ends successfully.
async fn run_stdio_transport(stream: Box<dyn Transport>, ctx: ServeContext) -> Result<()> {
    let mut connection = Connection::spawn(next_connection_id(), stream, ctx);
    let outcome = connection.disconnected().await;
    match &outcome.error {
        None => info!(connection = %connection.id(), "stdio connection closed"),
        Some(error) => warn!(
            connection = %connection.id(),
            %error,
            "stdio connection closed on error"
        ),
    }
    Ok(())
}
