//! Prometheus server metrics
//!
//! Connection and request counters shared by every connection and exposed
//! by the diagnostics endpoint. Each instance owns its own registry.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use langserver_domain::error::Result;

use crate::constants::METRICS_NAMESPACE;
use crate::error_ext::ErrorContext;

/// Connection and request metrics
#[derive(Clone)]
pub struct ServerMetrics {
    registry: Registry,
    connections_total: IntCounter,
    connections_active: IntGauge,
    requests_total: IntCounterVec,
    request_failures_total: IntCounterVec,
    requests_seen: Arc<AtomicU64>,
    started: Instant,
}

impl fmt::Debug for ServerMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerMetrics")
            .field("connections_total", &self.connections_total())
            .field("connections_active", &self.connections_active())
            .field("requests_total", &self.requests_total())
            .finish_non_exhaustive()
    }
}

impl ServerMetrics {
    /// Create and register every metric in a fresh registry
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let connections_total = IntCounter::with_opts(
            Opts::new("connections_total", "Connections accepted since start")
                .namespace(METRICS_NAMESPACE),
        )
        .internal_context("failed to create connections_total")?;
        let connections_active = IntGauge::with_opts(
            Opts::new("connections_active", "Connections currently being served")
                .namespace(METRICS_NAMESPACE),
        )
        .internal_context("failed to create connections_active")?;
        let requests_total = IntCounterVec::new(
            Opts::new("requests_total", "Requests dispatched to the handler")
                .namespace(METRICS_NAMESPACE),
            &["method"],
        )
        .internal_context("failed to create requests_total")?;
        let request_failures_total = IntCounterVec::new(
            Opts::new("request_failures_total", "Requests answered with an error")
                .namespace(METRICS_NAMESPACE),
            &["method"],
        )
        .internal_context("failed to create request_failures_total")?;

        registry
            .register(Box::new(connections_total.clone()))
            .internal_context("failed to register connections_total")?;
        registry
            .register(Box::new(connections_active.clone()))
            .internal_context("failed to register connections_active")?;
        registry
            .register(Box::new(requests_total.clone()))
            .internal_context("failed to register requests_total")?;
        registry
            .register(Box::new(request_failures_total.clone()))
            .internal_context("failed to register request_failures_total")?;

        Ok(Self {
            registry,
            connections_total,
            connections_active,
            requests_total,
            request_failures_total,
            requests_seen: Arc::new(AtomicU64::new(0)),
            started: Instant::now(),
        })
    }

    /// A connection started serving
    pub fn connection_opened(&self) {
        self.connections_total.inc();
        self.connections_active.inc();
    }

    /// A connection reached a terminal state
    pub fn connection_closed(&self) {
        self.connections_active.dec();
    }

    /// A request was dispatched to the handler
    pub fn request_started(&self, method: &str) {
        self.requests_total.with_label_values(&[method]).inc();
        self.requests_seen.fetch_add(1, Ordering::Relaxed);
    }

    /// A request was answered with an error
    pub fn request_failed(&self, method: &str) {
        self.request_failures_total
            .with_label_values(&[method])
            .inc();
    }

    /// Connections accepted since start
    pub fn connections_total(&self) -> u64 {
        self.connections_total.get()
    }

    /// Connections currently being served
    pub fn connections_active(&self) -> i64 {
        self.connections_active.get()
    }

    /// Requests dispatched since start, all methods
    pub fn requests_total(&self) -> u64 {
        self.requests_seen.load(Ordering::Relaxed)
    }

    /// Requests dispatched for one method
    pub fn requests_for(&self, method: &str) -> u64 {
        self.requests_total.with_label_values(&[method]).get()
    }

    /// Time since the metrics were created
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Underlying registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Prometheus text exposition of every metric
    pub fn encode(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .internal_context("failed to encode metrics")?;
        String::from_utf8(buffer).internal_context("metrics output is not UTF-8")
    }
}
