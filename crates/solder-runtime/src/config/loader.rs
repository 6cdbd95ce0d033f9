//! Configuration loader using figment.
//!
//! Sources are layered, later overriding earlier:
//!
//! 1. Built-in defaults
//! 2. Programmatic overrides ([`ConfigLoader::merge`])
//! 3. TOML configuration file (`solder.toml`, with the `toml-config` feature)
//! 4. Environment variables (`SOLDER_*`, `__` as section separator:
//!    `SOLDER_LOGGING__LEVEL=debug` → `logging.level = "debug"`)
//!
//! # Example
//!
//! ```rust,ignore
//! use solder_runtime::config::ConfigLoader;
//!
//! // Search the current directory for solder.toml, then apply env vars.
//! let config = ConfigLoader::new().with_current_dir().load()?;
//!
//! // Load a specific file.
//! let config = ConfigLoader::new().file("./bridge/solder.toml").load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Serialized};
#[cfg(feature = "toml-config")]
use figment::providers::{Format, Toml};
use tracing::{debug, info};

use super::error::{ConfigError, ConfigResult};
use super::schema::BridgeConfig;

/// Default configuration file name searched in each search path.
#[cfg(feature = "toml-config")]
const CONFIG_FILE_NAME: &str = "solder.toml";

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    /// Programmatic overrides merged above the defaults.
    figment: Figment,
    /// Directories searched for `solder.toml`.
    search_paths: Vec<PathBuf>,
    /// Whether to apply `SOLDER_*` environment variables.
    load_env: bool,
    /// Specific config file to load (skips the search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds the current directory to the search paths.
    pub fn with_current_dir(self) -> Self {
        if let Ok(cwd) = std::env::current_dir() {
            self.search_path(cwd)
        } else {
            self
        }
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Disables the `SOLDER_*` environment layer.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges configuration programmatically, above the defaults.
    pub fn merge(mut self, config: BridgeConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Loads, validates, and returns the configuration.
    pub fn load(self) -> ConfigResult<BridgeConfig> {
        let figment = self.build_figment()?;

        let config: BridgeConfig = figment.extract().map_err(|e| {
            ConfigError::ParseError(format!("Failed to extract configuration: {e}"))
        })?;
        config.validate()?;

        debug!(
            logging_level = %config.logging.level,
            plugin_count = config.plugins.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Builds the figment instance with all sources.
    fn build_figment(self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(BridgeConfig::default()));

        // Programmatic overrides.
        figment = figment.merge(self.figment);

        // Config file: a specific path must exist, searched paths may not.
        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = Self::merge_config_file(figment, path);
        } else {
            for dir in &self.search_paths {
                #[cfg(feature = "toml-config")]
                {
                    let candidate = dir.join(CONFIG_FILE_NAME);
                    if candidate.exists() {
                        info!(path = %candidate.display(), "Loading configuration file");
                        figment = Self::merge_config_file(figment, &candidate);
                        break;
                    }
                }
                #[cfg(not(feature = "toml-config"))]
                let _ = dir;
            }
        }

        // Environment variables override files.
        if self.load_env {
            figment = figment.merge(Env::prefixed("SOLDER_").split("__"));
        }

        Ok(figment)
    }

    #[cfg(feature = "toml-config")]
    fn merge_config_file(figment: Figment, path: &Path) -> Figment {
        figment.merge(Toml::file(path))
    }

    #[cfg(not(feature = "toml-config"))]
    fn merge_config_file(figment: Figment, _path: &Path) -> Figment {
        figment
    }
}

/// Loads configuration from the default locations.
///
/// Searches the current directory for `solder.toml` and applies `SOLDER_*`
/// environment variables on top.
pub fn load_config() -> ConfigResult<BridgeConfig> {
    ConfigLoader::new().with_current_dir().load()
}

/// Loads configuration from a specific file (plus environment overrides).
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<BridgeConfig> {
    ConfigLoader::new().file(path).load()
}

#[cfg(all(test, feature = "toml-config"))]
mod tests {
    use super::*;
    use crate::config::schema::{LogFormat, LogLevel};

    fn extract(toml: &str) -> BridgeConfig {
        let figment = Figment::from(Serialized::defaults(BridgeConfig::default()))
            .merge(Toml::string(toml));
        let config: BridgeConfig = figment.extract().expect("config should extract");
        config.validate().expect("config should validate");
        config
    }

    #[test]
    fn toml_round_trips_into_entries() {
        let config = extract(
            r#"
            [logging]
            level = "debug"
            format = "pretty"

            [preferences]
            FullScreen = "true"

            [[plugins]]
            service = "Device"
            class = "DeviceInfoPlugin"
            priority = 10
            eager = true

            [[plugins]]
            service = "Nav"
            class = "NavPlugin"
            url_filters = ["https://x.example/"]
            "#,
        );

        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.preferences["FullScreen"], "true");

        let entries = config.plugin_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].service, "Device");
        assert_eq!(entries[0].priority, 10);
        assert!(entries[0].eager);
        assert_eq!(
            entries[1].url_filters.as_deref(),
            Some(&["https://x.example/".to_string()][..])
        );
    }

    #[test]
    fn defaults_apply_when_fields_are_omitted() {
        let config = extract(
            r#"
            [[plugins]]
            service = "Echo"
            class = "EchoPlugin"
            "#,
        );

        assert_eq!(config.logging.level, LogLevel::Info);
        let entries = config.plugin_entries();
        assert_eq!(entries[0].priority, 0);
        assert!(!entries[0].eager);
        assert!(entries[0].url_filters.is_none());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = ConfigLoader::new()
            .file("/definitely/not/here/solder.toml")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
