//! Configuration management
//!
//! Raw configuration is collected from defaults, a TOML file, `LANGSERVER_`
//! environment variables and command-line overrides, then validated into
//! the domain [`Configuration`](langserver_domain::Configuration) in one
//! pure step.

pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, validate_config};
pub use types::{ConfigOverrides, RawConfig};
