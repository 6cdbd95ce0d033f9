//! Execution context handed to plugins.
//!
//! A plugin is initialized exactly once with a [`PluginContext`] before its
//! first use. The context bundles the host seam and the preference set; it
//! deliberately exposes nothing of the registry itself.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

/// Seam to the owning host shell.
///
/// The bridge consults the host before the plugins when routing a broadcast
/// message, mirroring the host's right of first refusal.
pub trait BridgeHost: Send + Sync {
    /// Handles a named message; a non-`None` return stops propagation.
    fn on_message(&self, _id: &str, _data: &Value) -> Option<Value> {
        None
    }
}

/// String-keyed preference set shared between the host and all plugins.
///
/// Values are stored as strings and parsed on access; absent or unparsable
/// values fall back to the caller-supplied default.
#[derive(Debug, Default)]
pub struct Preferences {
    values: RwLock<HashMap<String, String>>,
}

impl Preferences {
    /// Creates an empty preference set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    /// Returns the raw value for `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    /// Returns `true` when `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    /// String preference with a default.
    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Boolean preference with a default; parses case-insensitively.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(|v| v.to_lowercase().parse().ok())
            .unwrap_or(default)
    }

    /// Integer preference with a default.
    pub fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Floating-point preference with a default.
    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

impl FromIterator<(String, String)> for Preferences {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: RwLock::new(iter.into_iter().collect()),
        }
    }
}

/// Payload of a new-external-event broadcast.
#[derive(Debug, Clone)]
pub struct ExternalIntent {
    /// Optional action discriminator.
    pub action: Option<String>,
    /// Free-form event data.
    pub data: Value,
}

impl ExternalIntent {
    /// Creates an intent with an action and data payload.
    pub fn new(action: impl Into<String>, data: Value) -> Self {
        Self {
            action: Some(action.into()),
            data,
        }
    }

    /// Creates an intent carrying only data.
    pub fn from_data(data: Value) -> Self {
        Self { action: None, data }
    }
}

/// The execution context a plugin receives at one-time initialization.
#[derive(Clone)]
pub struct PluginContext {
    host: Arc<dyn BridgeHost>,
    preferences: Arc<Preferences>,
}

impl PluginContext {
    /// Creates a context over the given host and preference set.
    pub fn new(host: Arc<dyn BridgeHost>, preferences: Arc<Preferences>) -> Self {
        Self { host, preferences }
    }

    /// The owning host shell.
    pub fn host(&self) -> &Arc<dyn BridgeHost> {
        &self.host
    }

    /// The shared preference set.
    pub fn preferences(&self) -> &Arc<Preferences> {
        &self.preferences
    }
}

impl std::fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContext")
            .field("preferences", &self.preferences)
            .finish()
    }
}
