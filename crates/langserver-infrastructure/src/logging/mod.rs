//! Structured logging with tracing
//!
//! Installs a `tracing-subscriber` fmt layer writing through the
//! [`FanoutWriter`]: standard error always, plus an optional log file.
//! Standard output is never used because it carries protocol traffic in
//! stdio mode.

pub mod fanout;

use std::fs::File;
use std::path::PathBuf;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use langserver_domain::error::{Error, Result};
use langserver_domain::value_objects::{Configuration, Verbosity};

use crate::constants::LOG_FILTER_ENV;

pub use fanout::{FanoutWriter, LineBuffer, Sink};

/// Logging settings derived from the validated configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default filter level
    pub verbosity: Verbosity,
    /// Optional log file duplicated from the console
    pub log_file: Option<PathBuf>,
    /// JSON log lines instead of text
    pub json: bool,
}

impl From<&Configuration> for LoggingSettings {
    fn from(config: &Configuration) -> Self {
        Self {
            verbosity: config.verbosity,
            log_file: config.log_file.clone(),
            json: config.json_logs,
        }
    }
}

/// Releases the log file when dropped
///
/// Hold it for the whole process lifetime; every exit path drops it once.
#[must_use = "dropping the guard closes the log file"]
#[derive(Debug)]
pub struct LogGuard {
    writer: Option<FanoutWriter>,
}

impl LogGuard {
    /// Writer shared with the installed subscriber
    pub fn writer(&self) -> Option<&FanoutWriter> {
        self.writer.as_ref()
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            writer.release();
        }
    }
}

/// Build the fan-out writer for `settings`
///
/// The log file is created (or truncated) before anything is attached, so
/// on failure no partial logging state exists.
pub fn build_writer(settings: &LoggingSettings) -> Result<FanoutWriter> {
    let file = match &settings.log_file {
        Some(path) => {
            Some(File::create(path).map_err(|source| Error::log_file(path.clone(), source))?)
        }
        None => None,
    };

    let mut sinks = vec![Sink::permanent(std::io::stderr())];
    sinks.extend(file.map(Sink::releasable));
    Ok(FanoutWriter::new(sinks))
}

/// Initialize logging with the provided settings
///
/// `LANGSERVER_LOG` overrides the verbosity-derived filter. If a global
/// subscriber is already installed it is kept and the guard still owns
/// the log file.
pub fn init_logging(settings: &LoggingSettings) -> Result<LogGuard> {
    let writer = build_writer(settings)?;
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(settings.verbosity.filter_directive()));

    let installed = if settings.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer.clone())
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer.clone())
            .try_init()
            .is_ok()
    };

    if installed {
        info!(
            level = settings.verbosity.filter_directive(),
            log_file = ?settings.log_file,
            "logging initialized"
        );
    } else {
        debug!("global subscriber already installed, keeping it");
    }

    Ok(LogGuard {
        writer: Some(writer),
    })
}
