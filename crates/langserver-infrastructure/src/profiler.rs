//! Background profiler
//!
//! Optional HTTP diagnostics endpoint served by Rocket on a detached task.
//! It has no join or cancellation path and its failures never reach the
//! serve path.
//!
//! | Path | Description |
//! |------|-------------|
//! | `/healthz` | liveness, always `ok` |
//! | `/debug/vars` | process and connection counters as JSON |
//! | `/metrics` | prometheus text exposition |

use std::sync::Arc;

use rocket::config::Shutdown;
use rocket::http::{ContentType, Status};
use rocket::serde::json::Json;
use rocket::{Build, Rocket, State, get, routes};
use serde::Serialize;
use tracing::{info, warn};

use langserver_domain::error::{Error, Result};

use crate::address::resolve_address;
use crate::constants::DIAGNOSTICS_SERVICE_NAME;
use crate::metrics::ServerMetrics;

/// Payload of `/debug/vars`
#[derive(Debug, Clone, Serialize)]
pub struct DebugVars {
    /// Service name
    pub service: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Process id
    pub pid: u32,
    /// Seconds since the metrics were created
    pub uptime_seconds: u64,
    /// Connections currently being served
    pub connections_active: i64,
    /// Connections accepted since start
    pub connections_total: u64,
    /// Requests dispatched since start
    pub requests_total: u64,
}

impl DebugVars {
    fn collect(metrics: &ServerMetrics) -> Self {
        Self {
            service: DIAGNOSTICS_SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            pid: std::process::id(),
            uptime_seconds: metrics.uptime().as_secs(),
            connections_active: metrics.connections_active(),
            connections_total: metrics.connections_total(),
            requests_total: metrics.requests_total(),
        }
    }
}

#[get("/healthz")]
fn healthz() -> &'static str {
    "ok"
}

#[get("/debug/vars")]
fn debug_vars(metrics: &State<Arc<ServerMetrics>>) -> Json<DebugVars> {
    Json(DebugVars::collect(metrics))
}

#[get("/metrics")]
fn prometheus_metrics(
    metrics: &State<Arc<ServerMetrics>>,
) -> std::result::Result<(ContentType, String), Status> {
    metrics
        .encode()
        .map(|body| (ContentType::Plain, body))
        .map_err(|e| {
            warn!(error = %e, "failed to render metrics");
            Status::InternalServerError
        })
}

/// Build the diagnostics Rocket application
pub fn profiler_rocket(metrics: Arc<ServerMetrics>) -> Rocket<Build> {
    rocket::build()
        .manage(metrics)
        .mount("/", routes![healthz, debug_vars, prometheus_metrics])
}

/// Serve the diagnostics endpoint until it fails
///
/// Rocket's own signal handling is disabled so the endpoint never
/// intercepts Ctrl-C meant for the server.
pub async fn serve_profiler(address: &str, metrics: Arc<ServerMetrics>) -> Result<()> {
    let socket = resolve_address(address)
        .await
        .map_err(|e| Error::profiler(format!("invalid profiler address {address:?}: {e}")))?;

    let shutdown = Shutdown {
        ctrlc: false,
        #[cfg(unix)]
        signals: std::collections::HashSet::new(),
        ..Shutdown::default()
    };
    let figment = rocket::Config::figment()
        .merge(("address", socket.ip()))
        .merge(("port", socket.port()))
        .merge(("log_level", "off"))
        .merge(("shutdown", shutdown));

    info!(address = %socket, "profiler listening");
    profiler_rocket(metrics)
        .configure(figment)
        .launch()
        .await
        .map_err(|e| Error::profiler(format!("profiler on {socket} stopped: {e}")))?;
    Ok(())
}

/// Spawn the diagnostics endpoint as a detached task
///
/// Failures (bad address, port in use) are logged only.
pub fn spawn_profiler(address: String, metrics: Arc<ServerMetrics>) {
    tokio::spawn(async move {
        if let Err(e) = serve_profiler(&address, metrics).await {
            warn!(error = %e, "profiler unavailable");
        }
    });
}
