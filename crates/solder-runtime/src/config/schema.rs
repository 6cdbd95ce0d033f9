//! Configuration schema definitions.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use solder_core::context::Preferences;
use solder_core::entry::PluginEntry;

use super::error::{ConfigError, ConfigResult};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Shared preference map handed to every plugin at initialization.
    #[serde(default)]
    pub preferences: HashMap<String, String>,

    /// Ordered plugin entry list.
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
}

impl BridgeConfig {
    /// Converts the configured plugin list into registry entries,
    /// preserving list order.
    pub fn plugin_entries(&self) -> Vec<PluginEntry> {
        self.plugins.iter().map(PluginConfig::to_entry).collect()
    }

    /// Builds the shared preference set.
    pub fn build_preferences(&self) -> Preferences {
        self.preferences
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Validates invariants the schema cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = std::collections::HashSet::new();
        for plugin in &self.plugins {
            if plugin.service.is_empty() {
                return Err(ConfigError::validation("plugin entry with empty service name"));
            }
            if plugin.class.is_empty() {
                return Err(ConfigError::validation(format!(
                    "plugin '{}' has an empty class name",
                    plugin.service
                )));
            }
            if !seen.insert(plugin.service.as_str()) {
                return Err(ConfigError::validation(format!(
                    "duplicate plugin service '{}'",
                    plugin.service
                )));
            }
        }
        Ok(())
    }
}

/// One `[[plugins]]` table: a plugin entry as written in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Service name the plugin resolves under.
    pub service: String,

    /// Registered class name to construct the plugin from.
    pub class: String,

    /// Broadcast ordering key; lower values are notified first.
    #[serde(default)]
    pub priority: i32,

    /// Construct at bridge init instead of on first dispatch.
    #[serde(default)]
    pub eager: bool,

    /// Legacy URL-prefix routing rules.
    #[serde(default)]
    pub url_filters: Vec<String>,
}

impl PluginConfig {
    /// Converts this table into a registry entry.
    pub fn to_entry(&self) -> PluginEntry {
        let mut entry = PluginEntry::from_class(&self.service, &self.class)
            .with_priority(self.priority)
            .eager(self.eager);
        if !self.url_filters.is_empty() {
            entry = entry.with_url_filters(self.url_filters.clone());
        }
        entry
    }
}

// =============================================================================
// Logging configuration
// =============================================================================

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Output destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Log file path, for [`LogOutput::File`].
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Per-module level overrides (`module = "level"`).
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,

    /// Include thread ids in log lines.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include file/line locations in log lines.
    #[serde(default)]
    pub file_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            file_path: None,
            filters: HashMap::new(),
            thread_ids: false,
            file_location: false,
        }
    }
}

/// Log level as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level (default).
    #[default]
    Info,
    /// Warn level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }

    /// Lowercase directive form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line compact output (default).
    #[default]
    Compact,
    /// Default `tracing-subscriber` format.
    Full,
    /// Multi-line human-friendly output.
    Pretty,
    /// JSON lines (requires the `json-log` feature).
    Json,
}

/// Log output destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output (default).
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
    /// A log file (see `file_path`).
    File,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(service: &str, class: &str) -> PluginConfig {
        PluginConfig {
            service: service.to_string(),
            class: class.to_string(),
            priority: 0,
            eager: false,
            url_filters: Vec::new(),
        }
    }

    #[test]
    fn plugin_entries_preserve_order_and_defaults() {
        let config = BridgeConfig {
            plugins: vec![plugin("Echo", "EchoPlugin"), plugin("Device", "DevicePlugin")],
            ..Default::default()
        };

        let entries = config.plugin_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].service, "Echo");
        assert_eq!(entries[1].service, "Device");
        assert_eq!(entries[0].priority, 0);
        assert!(!entries[0].eager);
        assert!(entries[0].url_filters.is_none());
    }

    #[test]
    fn duplicate_services_fail_validation() {
        let config = BridgeConfig {
            plugins: vec![plugin("Echo", "EchoPlugin"), plugin("Echo", "OtherPlugin")],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_class_fails_validation() {
        let config = BridgeConfig {
            plugins: vec![plugin("Echo", "")],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn preferences_are_shared_as_built() {
        let config = BridgeConfig {
            preferences: [("LogLevel".to_string(), "debug".to_string())].into(),
            ..Default::default()
        };
        let prefs = config.build_preferences();
        assert_eq!(prefs.get_str("LogLevel", ""), "debug");
    }
}
