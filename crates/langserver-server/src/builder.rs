//! Language server builder
//!
//! Collects the configuration and the injected collaborators. Required
//! pieces are checked in [`LanguageServerBuilder::try_build`]; optional ones
//! fall back to what the configuration asks for when the server runs.

use std::sync::Arc;

use langserver_domain::ports::{Handler, RequestTracer};
use langserver_domain::value_objects::Configuration;
use langserver_infrastructure::metrics::ServerMetrics;

use crate::LanguageServer;
use crate::transport::Transport;

/// Builder for [`LanguageServer`]
#[derive(Default)]
pub struct LanguageServerBuilder {
    configuration: Option<Configuration>,
    handler: Option<Arc<dyn Handler>>,
    tracer: Option<Arc<dyn RequestTracer>>,
    metrics: Option<Arc<ServerMetrics>>,
    stdio_transport: Option<Box<dyn Transport>>,
}

impl LanguageServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validated configuration
    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Set the request handler
    pub fn with_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Use this tracer instead of bootstrapping one from the configuration
    pub fn with_tracer(mut self, tracer: Arc<dyn RequestTracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Share existing metrics instead of creating fresh ones
    pub fn with_metrics(mut self, metrics: Arc<ServerMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Serve stdio mode over this stream instead of the process streams
    pub fn with_stdio_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.stdio_transport = Some(transport);
        self
    }

    /// Build the server
    ///
    /// # Errors
    /// Returns `BuilderError::MissingDependency` if the configuration or the
    /// handler is not provided
    pub fn try_build(self) -> Result<LanguageServer, BuilderError> {
        let configuration = self
            .configuration
            .ok_or(BuilderError::MissingDependency("configuration"))?;
        let handler = self
            .handler
            .ok_or(BuilderError::MissingDependency("request handler"))?;

        Ok(LanguageServer {
            configuration,
            handler,
            tracer: self.tracer,
            metrics: self.metrics,
            stdio_transport: self.stdio_transport,
        })
    }
}

/// Errors that can occur during server building
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    /// A required dependency was not provided
    #[error("Missing required dependency: {0}")]
    MissingDependency(&'static str),
}
