//! Configuration module for the Solder runtime.
//!
//! Loads the bridge configuration — logging settings, the shared preference
//! map, and the ordered plugin entry list — from TOML files, environment
//! variables, and programmatic defaults.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, load_config, load_config_from_file};
pub use schema::{BridgeConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, PluginConfig};
