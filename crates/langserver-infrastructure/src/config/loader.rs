//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables,
//! command-line overrides and default values, and validates the result.

use std::env;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use tracing::debug;

use langserver_domain::constants::TRACING_TOKEN_ENV;
use langserver_domain::error::{Error, Result};
use langserver_domain::value_objects::{
    Configuration, Framing, TracingSettings, TransportMode, Verbosity,
};

use crate::config::{ConfigOverrides, RawConfig};
use crate::constants::{
    CONFIG_ENV_PREFIX, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME, LOG_FILTER_ENV,
};
use crate::error_ext::ErrorContext;

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Explicit configuration file path
    config_path: Option<PathBuf>,

    /// Command-line values, highest priority
    overrides: ConfigOverrides,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            overrides: ConfigOverrides::default(),
        }
    }

    /// Set the configuration file path; the file must exist
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set command-line overrides
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Get the explicit configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Collect raw configuration from all sources
    ///
    /// Later sources override earlier ones:
    /// 1. `RawConfig::default()`
    /// 2. `LIGHTSTEP_ACCESS_TOKEN`
    /// 3. TOML configuration file (explicit, or discovered)
    /// 4. Environment variables with prefix (e.g. `LANGSERVER_MODE`)
    /// 5. Command-line overrides
    pub fn load_raw(&self) -> Result<RawConfig> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(RawConfig::default()))
            .merge(
                Env::raw()
                    .only(&[TRACING_TOKEN_ENV])
                    .map(|_| "tracing_token".into()),
            );

        if let Some(config_path) = &self.config_path {
            if !config_path.is_file() {
                return Err(Error::config(format!(
                    "configuration file not found: {}",
                    config_path.display()
                )));
            }
            debug!(path = %config_path.display(), "loading configuration file");
            figment = figment.merge(Toml::file(config_path));
        } else if let Some(default_path) = Self::find_default_config_path() {
            debug!(path = %default_path.display(), "loading discovered configuration file");
            figment = figment.merge(Toml::file(default_path));
        }

        // The log filter variable shares the prefix but is not a config key.
        let filter_key = LOG_FILTER_ENV
            .strip_prefix(&format!("{CONFIG_ENV_PREFIX}_"))
            .unwrap_or(LOG_FILTER_ENV)
            .to_ascii_lowercase();
        figment = figment.merge(
            Env::prefixed(&format!("{CONFIG_ENV_PREFIX}_")).ignore(&[filter_key.as_str()]),
        );

        figment = figment.merge(Serialized::defaults(&self.overrides));

        figment
            .extract()
            .config_context("failed to extract configuration")
    }

    /// Load and validate configuration from all sources
    pub fn load(&self) -> Result<Configuration> {
        validate_config(&self.load_raw()?)
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(current_dir) = env::current_dir() {
            candidates.push(current_dir.join(DEFAULT_CONFIG_FILENAME));
        }
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(
                config_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            );
        }

        candidates.into_iter().find(|path| path.is_file())
    }
}

/// Validate raw configuration
///
/// Pure: touches no file, socket or global state, so a rejected
/// configuration leaves nothing behind.
pub fn validate_config(raw: &RawConfig) -> Result<Configuration> {
    let mode: TransportMode = raw.mode.parse()?;
    let verbosity = Verbosity::from_flags(raw.verbose, raw.quiet)?;
    let framing: Framing = raw.framing.parse()?;
    validate_address(mode, &raw.addr)?;

    Ok(Configuration {
        mode,
        address: raw.addr.clone(),
        profiler_address: non_empty(&raw.prof_http),
        log_file: non_empty(&raw.log_file).map(PathBuf::from),
        tracing: TracingSettings {
            token: raw.tracing_token.as_deref().and_then(non_empty),
            endpoint: raw.tracing_endpoint.clone(),
        },
        verbosity,
        framing,
        json_logs: raw.log_json,
    })
}

fn validate_address(mode: TransportMode, address: &str) -> Result<()> {
    if mode == TransportMode::Tcp && address.trim().is_empty() {
        return Err(Error::config("tcp mode requires a listen address"));
    }
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
