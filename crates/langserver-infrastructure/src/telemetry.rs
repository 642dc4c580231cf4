//! Distributed tracing bootstrap
//!
//! Process-wide and initialize-once. With an access token an OTLP/HTTP
//! exporter is installed as the global tracer provider and requests get
//! real spans; without one the connection server receives a
//! [`NoopTracer`]. Tracing failures are logged and never stop the server.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use opentelemetry::global::{self, BoxedSpan, BoxedTracer};
use opentelemetry::trace::{Span, Status, Tracer};
use opentelemetry::KeyValue;
use opentelemetry_otlp::{WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing::{debug, info, warn};

use langserver_domain::error::{Error, Result};
use langserver_domain::ports::{NoopTracer, RequestSpan, RequestTracer};
use langserver_domain::value_objects::{ConnectionId, ResponseError, TracingSettings};

use crate::constants::{TRACER_NAME, TRACING_SERVICE_NAME, TRACING_TOKEN_HEADER};
use crate::error_ext::ErrorContext;

static PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Initialize distributed tracing
///
/// Returns the tracer to inject into the connection server. Calling this
/// again after a successful install reuses the installed provider.
pub fn init_tracing(settings: &TracingSettings) -> Arc<dyn RequestTracer> {
    if !settings.is_enabled() {
        debug!("distributed tracing disabled");
        return Arc::new(NoopTracer);
    }

    match install_provider(settings) {
        Ok(()) => {
            info!(endpoint = %settings.endpoint, "distributed tracing enabled");
            Arc::new(OtelRequestTracer::new())
        }
        Err(e) => {
            warn!(error = %e, "distributed tracing unavailable");
            Arc::new(NoopTracer)
        }
    }
}

/// Whether a tracer provider has been installed in this process
pub fn is_tracer_installed() -> bool {
    PROVIDER.get().is_some()
}

/// Flush pending spans and shut the provider down
///
/// Best effort: failures are logged. Blocks while the exporter drains.
pub fn shutdown_tracing() {
    if let Some(provider) = PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            warn!(error = %e, "tracer shutdown failed");
        }
    }
}

fn install_provider(settings: &TracingSettings) -> Result<()> {
    if PROVIDER.get().is_some() {
        return Ok(());
    }

    let provider = build_provider(settings)?;
    let mut stored = false;
    let provider = PROVIDER.get_or_init(|| {
        stored = true;
        provider
    });
    if stored {
        global::set_tracer_provider(provider.clone());
    }
    Ok(())
}

fn build_provider(settings: &TracingSettings) -> Result<SdkTracerProvider> {
    let token = settings
        .token
        .as_deref()
        .ok_or_else(|| Error::tracing("missing access token"))?;

    let mut headers = HashMap::new();
    headers.insert(TRACING_TOKEN_HEADER.to_string(), token.to_string());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(settings.endpoint.clone())
        .with_headers(headers)
        .build()
        .tracing_context("failed to build span exporter")?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            Resource::builder()
                .with_service_name(TRACING_SERVICE_NAME)
                .build(),
        )
        .build())
}

/// Request tracer backed by the global OpenTelemetry provider
struct OtelRequestTracer {
    tracer: BoxedTracer,
}

impl OtelRequestTracer {
    fn new() -> Self {
        Self {
            tracer: global::tracer(TRACER_NAME),
        }
    }
}

impl RequestTracer for OtelRequestTracer {
    fn start_request(&self, method: &str, connection: ConnectionId) -> Box<dyn RequestSpan> {
        let mut span = self.tracer.start(method.to_string());
        span.set_attribute(KeyValue::new("rpc.system", "jsonrpc"));
        span.set_attribute(KeyValue::new("rpc.method", method.to_string()));
        span.set_attribute(KeyValue::new(
            "langserver.connection",
            i64::try_from(connection.get()).unwrap_or(i64::MAX),
        ));
        Box::new(OtelSpan { span })
    }
}

struct OtelSpan {
    span: BoxedSpan,
}

impl RequestSpan for OtelSpan {
    fn record_error(&mut self, error: &ResponseError) {
        self.span.set_attribute(KeyValue::new(
            "rpc.jsonrpc.error_code",
            i64::from(error.code),
        ));
        self.span.set_status(Status::error(error.message.clone()));
    }
}

impl Drop for OtelSpan {
    fn drop(&mut self) {
        self.span.end();
    }
}
