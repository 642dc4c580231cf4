//! Command-line interface
//!
//! Flags only override what the configuration file and environment set;
//! a flag left off the command line contributes nothing.
//!
//! Long flags are also accepted with a single dash (`-mode tcp`,
//! `-addr=:2088`) so existing launch scripts keep working.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use langserver_domain::error::Result;
use langserver_domain::value_objects::Configuration;
use langserver_infrastructure::config::{ConfigLoader, ConfigOverrides};

/// Long flag names accepted after a single dash
const LONG_FLAGS: &[&str] = &[
    "mode",
    "addr",
    "prof-http",
    "log",
    "config",
    "verbose",
    "quiet",
    "framing",
    "log-json",
];

/// Rewrite single-dash long flags to their `--` form
///
/// Arguments after a bare `--` and values that are not flags pass through
/// unchanged.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut after_separator = false;
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            if after_separator {
                return arg;
            }
            if arg == "--" {
                after_separator = true;
                return arg;
            }
            let rewritten = arg
                .to_str()
                .and_then(single_dash_long_flag)
                .map(|text| format!("-{text}"));
            rewritten.map_or(arg, OsString::from)
        })
        .collect()
}

fn single_dash_long_flag(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    LONG_FLAGS.contains(&name).then_some(text)
}

/// Command line interface for the language server
#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(name = "langserver")]
#[command(about = "Language server front end over stdio or TCP")]
#[command(version)]
#[command(after_help = "Long flags also accept a single dash, e.g. `-mode tcp`.")]
pub struct Cli {
    /// Transport mode: stdio or tcp
    #[arg(long)]
    pub mode: Option<String>,

    /// TCP listen address; `:port` listens on all interfaces
    #[arg(long)]
    pub addr: Option<String>,

    /// Serve the diagnostics endpoint on this address
    #[arg(long = "prof-http", value_name = "ADDR")]
    pub prof_http: Option<String>,

    /// Duplicate log output to this file
    #[arg(long = "log", value_name = "FILE")]
    pub log_file: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log warnings and errors only
    #[arg(short, long)]
    pub quiet: bool,

    /// Message framing: header or line
    #[arg(long)]
    pub framing: Option<String>,

    /// Emit log lines as JSON
    #[arg(long = "log-json")]
    pub log_json: bool,
}

impl Cli {
    /// Parse the process arguments, accepting single-dash long flags
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Values given on the command line
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            mode: self.mode.clone(),
            addr: self.addr.clone(),
            prof_http: self.prof_http.clone(),
            log_file: self.log_file.clone(),
            verbose: self.verbose.then_some(true),
            quiet: self.quiet.then_some(true),
            framing: self.framing.clone(),
            log_json: self.log_json.then_some(true),
        }
    }

    /// Loader merging defaults, file, environment and these flags
    pub fn loader(&self) -> ConfigLoader {
        let loader = ConfigLoader::new().with_overrides(self.overrides());
        match &self.config {
            Some(path) => loader.with_config_path(path),
            None => loader,
        }
    }

    /// Load and validate the effective configuration
    pub fn configuration(&self) -> Result<Configuration> {
        self.loader().load()
    }
}
