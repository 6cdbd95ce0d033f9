//! Plugin registry: the ordered entry set and the live-instance view.
//!
//! The registry owns two pieces of state:
//!
//! - `entries` — the canonical, priority-sorted descriptor list. The sort is
//!   stable, so entries with equal priority keep their insertion order.
//! - `live` — the materialized instances, keyed by service. This is a view:
//!   its iteration order is always derived from `entries`
//!   ([`live_in_order`](PluginRegistry::live_in_order)), never tracked
//!   separately.
//!
//! All mutation and resolution happens on the owning control task; the
//! registry performs no internal locking.

use std::collections::HashMap;

use tracing::{debug, error};

use solder_core::context::PluginContext;
use solder_core::entry::{PluginEntry, PluginSource};
use solder_core::factory;
use solder_core::plugin::BoxedPlugin;

/// Ordered collection of plugin entries and their live instances.
pub struct PluginRegistry {
    /// Canonical entry list, stably sorted by priority.
    entries: Vec<PluginEntry>,
    /// Materialized instances; subset of `entries`' services.
    live: HashMap<String, BoxedPlugin>,
    /// Legacy URL filters, keyed by service.
    url_filters: HashMap<String, Vec<String>>,
    /// Execution context handed to every plugin at initialization.
    ctx: PluginContext,
}

impl PluginRegistry {
    /// Creates an empty registry over the given execution context.
    pub fn new(ctx: PluginContext) -> Self {
        Self {
            entries: Vec::new(),
            live: HashMap::new(),
            url_filters: HashMap::new(),
            ctx,
        }
    }

    /// Creates a registry pre-populated with `entries`.
    pub fn with_entries(ctx: PluginContext, entries: Vec<PluginEntry>) -> Self {
        let mut registry = Self::new(ctx);
        registry.ingest(entries);
        registry
    }

    /// Number of configured entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of materialized instances.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// The entry configured for `service`, if any.
    pub fn entry(&self, service: &str) -> Option<&PluginEntry> {
        self.entries.iter().find(|e| e.service == service)
    }

    /// Returns `true` when `service` has a materialized instance.
    pub fn is_live(&self, service: &str) -> bool {
        self.live.contains_key(service)
    }

    /// The live instance for `service` without materializing one.
    pub fn get_live(&self, service: &str) -> Option<BoxedPlugin> {
        self.live.get(service).cloned()
    }

    /// Configured service names in canonical (priority) order.
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.service.as_str())
    }

    /// Live instances in canonical entry order.
    ///
    /// This is the ordering used by every broadcast; it follows the entry
    /// sort even for instances that were materialized out of order.
    pub fn live_in_order(&self) -> impl Iterator<Item = (&str, &BoxedPlugin)> {
        self.entries
            .iter()
            .filter_map(|e| self.live.get(&e.service).map(|p| (e.service.as_str(), p)))
    }

    /// Resolves `service` to a live instance, materializing it on first use.
    ///
    /// Returns `None` when no entry is configured for `service` or when
    /// instantiation fails; instantiation failures are logged here and
    /// reported to the command caller as a service-not-found result by the
    /// dispatcher, never raised.
    pub fn resolve(&mut self, service: &str) -> Option<BoxedPlugin> {
        if let Some(plugin) = self.live.get(service) {
            return Some(plugin.clone());
        }
        let entry = self.entries.iter().find(|e| e.service == service)?;
        let plugin = match &entry.source {
            PluginSource::Instance(plugin) => plugin.clone(),
            PluginSource::Class(class) => match factory::instantiate(class) {
                Ok(plugin) => plugin,
                Err(e) => {
                    error!(service, class = %class, error = %e, "Failed to instantiate plugin");
                    return None;
                }
            },
        };
        plugin.initialize(&self.ctx);
        debug!(service, "Plugin materialized");
        self.live.insert(service.to_string(), plugin.clone());
        Some(plugin)
    }

    /// Adds `entry`, replacing any existing entry for the same service, and
    /// re-sorts the entry set by priority.
    ///
    /// An entry carrying a pre-built instance is initialized immediately and
    /// registered live.
    pub fn add_entry(&mut self, entry: PluginEntry) {
        self.insert_entry(entry);
        self.entries.sort_by_key(|e| e.priority);
    }

    /// Replaces the whole entry set.
    ///
    /// Every currently live instance receives one `on_pause(false)` and one
    /// `on_destroy` before being dropped; the live view and filter map are
    /// then rebuilt from `entries` alone.
    pub fn set_entries(&mut self, entries: Vec<PluginEntry>) {
        self.broadcast_pause(false);
        self.broadcast_destroy();
        self.live.clear();
        self.url_filters.clear();
        self.entries.clear();
        self.ingest(entries);
    }

    /// Tears down per-page plugin state and restarts eager plugins.
    ///
    /// Called on each content navigation. Live instances are notified
    /// (`on_pause(false)` then `on_destroy`) but stay materialized; only
    /// [`set_entries`](Self::set_entries) drops them.
    pub fn init(&mut self) {
        debug!("init()");
        self.broadcast_pause(false);
        self.broadcast_destroy();
        self.start_eager_plugins();
    }

    /// Materializes every entry marked eager.
    pub fn start_eager_plugins(&mut self) {
        let eager: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.eager)
            .map(|e| e.service.clone())
            .collect();
        for service in eager {
            self.resolve(&service);
        }
    }

    /// The URL filters recorded for `service`, if any.
    pub(crate) fn url_filters_for(&self, service: &str) -> Option<&[String]> {
        self.url_filters.get(service).map(Vec::as_slice)
    }

    /// Ingests a batch of entries with a single sort.
    fn ingest(&mut self, entries: Vec<PluginEntry>) {
        for entry in entries {
            self.insert_entry(entry);
        }
        self.entries.sort_by_key(|e| e.priority);
    }

    /// Records filters, registers provided instances, and stores the entry
    /// (replacing a same-service predecessor). Does not sort.
    fn insert_entry(&mut self, entry: PluginEntry) {
        if let Some(filters) = &entry.url_filters {
            self.url_filters
                .insert(entry.service.clone(), filters.clone());
        }
        if let PluginSource::Instance(plugin) = &entry.source {
            plugin.initialize(&self.ctx);
            self.live.insert(entry.service.clone(), plugin.clone());
        }
        match self.entries.iter().position(|e| e.service == entry.service) {
            Some(pos) => self.entries[pos] = entry,
            None => self.entries.push(entry),
        }
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("entry_count", &self.entries.len())
            .field("live_count", &self.live.len())
            .finish()
    }
}
