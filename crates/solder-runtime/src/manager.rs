//! Bridge manager — the public entry point of the bridge.
//!
//! [`BridgeManager`] is what the embedding shell holds: it owns the
//! [`PluginRegistry`], dispatches incoming `exec` requests, and forwards
//! lifecycle notifications. Every command outcome — success, recognized
//! error kind, or generic failure — terminates in exactly one terminal
//! result on the caller's callback channel; nothing a plugin does can raise
//! a fault out of the dispatch path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, error, warn};

use solder_core::args::RawArgs;
use solder_core::channel::{CallbackChannel, ResultSink};
use solder_core::context::{BridgeHost, ExternalIntent, PluginContext, Preferences};
use solder_core::entry::PluginEntry;
use solder_core::error::ExecError;
use solder_core::result::{PluginResult, ResultStatus};

use crate::registry::PluginRegistry;

/// Hand-offs slower than this log a warning: the control task is also the
/// host's latency-sensitive thread. Debug builds get more slack.
const SLOW_EXEC_WARNING_THRESHOLD: Duration = if cfg!(debug_assertions) {
    Duration::from_millis(60)
} else {
    Duration::from_millis(16)
};

/// Owner of the registry and entry point for commands and lifecycle events.
///
/// All methods are meant to run on one control task; see the crate docs for
/// the threading model.
pub struct BridgeManager {
    registry: PluginRegistry,
    host: Arc<dyn BridgeHost>,
    sink: Arc<dyn ResultSink>,
}

impl BridgeManager {
    /// Creates a manager with an empty registry.
    pub fn new(
        host: Arc<dyn BridgeHost>,
        sink: Arc<dyn ResultSink>,
        preferences: Preferences,
    ) -> Self {
        let ctx = PluginContext::new(Arc::clone(&host), Arc::new(preferences));
        Self {
            registry: PluginRegistry::new(ctx),
            host,
            sink,
        }
    }

    /// Creates a manager pre-configured with `entries`.
    pub fn with_entries(
        host: Arc<dyn BridgeHost>,
        sink: Arc<dyn ResultSink>,
        preferences: Preferences,
        entries: Vec<PluginEntry>,
    ) -> Self {
        let mut manager = Self::new(host, sink, preferences);
        manager.registry.set_entries(entries);
        manager
    }

    /// Read access to the underlying registry.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Adds or replaces one plugin entry.
    pub fn add_entry(&mut self, entry: PluginEntry) {
        self.registry.add_entry(entry);
    }

    /// Replaces the full entry set, tearing down current instances.
    pub fn set_entries(&mut self, entries: Vec<PluginEntry>) {
        self.registry.set_entries(entries);
    }

    /// Resets per-page plugin state and starts eager plugins.
    ///
    /// Call on every content navigation.
    pub fn init(&mut self) {
        self.registry.init();
    }

    /// Dispatches one command to the plugin registered for `service`.
    ///
    /// `raw_args` is the serialized JSON argument array as received from the
    /// caller. The returned future resolves when the plugin's hand-off
    /// completes — not necessarily when the command does; final results may
    /// arrive later through the sink under `correlation_id`.
    pub async fn exec(&mut self, service: &str, action: &str, correlation_id: &str, raw_args: &str) {
        let Some(plugin) = self.registry.resolve(service) else {
            debug!(service, "exec() call to unknown plugin service");
            self.sink
                .send(correlation_id, PluginResult::status(ResultStatus::ClassNotFound));
            return;
        };

        let channel = CallbackChannel::new(correlation_id, Arc::clone(&self.sink));
        let started = Instant::now();
        let outcome = plugin
            .execute(action, RawArgs::new(raw_args), channel.clone())
            .await;
        let elapsed = started.elapsed();

        if elapsed > SLOW_EXEC_WARNING_THRESHOLD {
            warn!(
                service,
                action,
                elapsed_ms = elapsed.as_millis() as u64,
                "exec() hand-off blocked the control task; move slow work to a background task"
            );
        }

        match outcome {
            Ok(true) => {}
            Ok(false) => channel.send(PluginResult::status(ResultStatus::InvalidAction)),
            Err(ExecError::Args(reason)) => {
                debug!(service, action, %reason, "Argument deserialization failed");
                channel.send(PluginResult::status(ResultStatus::JsonError));
            }
            Err(ExecError::Plugin(e)) => {
                error!(service, action, error = %e, "Uncaught failure from plugin");
                channel.error(e.to_string());
            }
        }
    }

    // ─── Lifecycle hooks exposed to the host shell ───────────────────────────

    /// The host is moving to the background.
    pub fn on_pause(&self, multitasking: bool) {
        self.registry.broadcast_pause(multitasking);
    }

    /// The host returned to the foreground.
    pub fn on_resume(&self, multitasking: bool) {
        self.registry.broadcast_resume(multitasking);
    }

    /// Final teardown of the bridge session.
    pub fn on_destroy(&self) {
        self.registry.broadcast_destroy();
    }

    /// A new external event arrived at the host.
    pub fn on_new_intent(&self, intent: &ExternalIntent) {
        self.registry.broadcast_new_intent(intent);
    }

    /// The content layer navigated or refreshed.
    pub fn on_reset(&self) {
        self.registry.broadcast_reset();
    }

    /// Routes a named message, giving the host first refusal.
    ///
    /// Returns the host's answer when it provides one; otherwise the first
    /// non-`None` plugin answer in entry order.
    pub fn post_message(&self, id: &str, data: &Value) -> Option<Value> {
        if let Some(answer) = self.host.on_message(id, data) {
            return Some(answer);
        }
        self.registry.broadcast_message(id, data)
    }

    /// Asks the plugins to remap a resource locator.
    pub fn remap_uri(&self, uri: &str) -> Option<String> {
        self.registry.remap_uri(uri)
    }

    /// Legacy URL-filter navigation interception; `true` blocks the load.
    pub fn on_override_url_loading(&mut self, url: &str) -> bool {
        self.registry.override_url_loading(url)
    }
}

impl std::fmt::Debug for BridgeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeManager")
            .field("registry", &self.registry)
            .finish()
    }
}
