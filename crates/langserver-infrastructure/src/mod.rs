//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns supporting the server crate.
//!
//! ## Module Categories
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | figment loading (defaults, TOML, env, CLI) and validation |
//! | [`constants`] | Deployment defaults |
//! | [`address`] | `:port` listen address shorthand |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Fan-out log sink and subscriber setup |
//! | [`telemetry`] | Initialize-once distributed tracer |
//! | [`metrics`] | Prometheus connection and request counters |
//! | [`profiler`] | Detached HTTP diagnostics endpoint |

pub mod address;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;
pub mod metrics;
pub mod profiler;
pub mod telemetry;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigOverrides, RawConfig, validate_config};
pub use error_ext::ErrorContext;
pub use logging::{LogGuard, LoggingSettings, init_logging};
pub use metrics::ServerMetrics;
pub use profiler::spawn_profiler;
pub use telemetry::{init_tracing, is_tracer_installed, shutdown_tracing};
