//! Lifecycle and message broadcasting across live plugins.
//!
//! Every broadcast walks the live view in canonical entry order. Message
//! style broadcasts stop at the first plugin that answers; lifecycle
//! notifications always reach every live instance.

use tracing::{debug, error};

use serde_json::Value;
use solder_core::context::ExternalIntent;

use crate::registry::PluginRegistry;

impl PluginRegistry {
    /// Notifies every live plugin that the host is moving to the background.
    pub fn broadcast_pause(&self, multitasking: bool) {
        for (_, plugin) in self.live_in_order() {
            plugin.on_pause(multitasking);
        }
    }

    /// Notifies every live plugin that the host returned to the foreground.
    pub fn broadcast_resume(&self, multitasking: bool) {
        for (_, plugin) in self.live_in_order() {
            plugin.on_resume(multitasking);
        }
    }

    /// Destroys every live plugin.
    ///
    /// A failing teardown is logged and does not stop the teardown of the
    /// remaining plugins.
    pub fn broadcast_destroy(&self) {
        for (service, plugin) in self.live_in_order() {
            if let Err(e) = plugin.on_destroy() {
                error!(service, error = %e, "Plugin teardown failed");
            }
        }
    }

    /// Offers a named message to the live plugins in order.
    ///
    /// Returns the first non-`None` answer, or `None` when every plugin
    /// passes. The host itself is consulted before this method — see
    /// [`BridgeManager::post_message`](crate::manager::BridgeManager::post_message).
    pub fn broadcast_message(&self, id: &str, data: &Value) -> Option<Value> {
        for (_, plugin) in self.live_in_order() {
            if let Some(answer) = plugin.on_message(id, data) {
                return Some(answer);
            }
        }
        None
    }

    /// Delivers a new external event to every live plugin.
    pub fn broadcast_new_intent(&self, intent: &ExternalIntent) {
        for (_, plugin) in self.live_in_order() {
            plugin.on_new_intent(intent);
        }
    }

    /// Notifies every live plugin of a content navigation or refresh.
    pub fn broadcast_reset(&self) {
        for (_, plugin) in self.live_in_order() {
            plugin.on_reset();
        }
    }

    /// Asks the live plugins to remap a resource locator.
    ///
    /// Returns the first non-`None` remap.
    pub fn remap_uri(&self, uri: &str) -> Option<String> {
        for (_, plugin) in self.live_in_order() {
            if let Some(remapped) = plugin.remap_uri(uri) {
                return Some(remapped);
            }
        }
        None
    }

    /// Legacy URL-filter navigation interception.
    ///
    /// Walks the entries in order. An entry with filters whose prefix
    /// matches `url` is force-resolved and its verdict returned. Entries
    /// without filters are consulted only when already live — they are never
    /// force-resolved here — and short-circuit on `true`. Defaults to
    /// `false` (allow the navigation).
    pub fn override_url_loading(&mut self, url: &str) -> bool {
        let services: Vec<(String, bool)> = self
            .services()
            .map(|s| (s.to_string(), self.url_filters_for(s).is_some()))
            .collect();

        for (service, has_filters) in services {
            if has_filters {
                let matched = self
                    .url_filters_for(&service)
                    .is_some_and(|filters| filters.iter().any(|f| url.starts_with(f.as_str())));
                if matched {
                    debug!(service = %service, url, "URL filter matched");
                    // A failed resolution logs and allows the navigation.
                    return self
                        .resolve(&service)
                        .is_some_and(|plugin| plugin.on_override_url_loading(url));
                }
            } else if let Some(plugin) = self.get_live(&service) {
                if plugin.on_override_url_loading(url) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use serde_json::json;
    use solder_core::args::RawArgs;
    use solder_core::channel::CallbackChannel;
    use solder_core::context::{BridgeHost, PluginContext, Preferences};
    use solder_core::entry::PluginEntry;
    use solder_core::error::ExecError;
    use solder_core::plugin::BridgePlugin;

    struct NullHost;
    impl BridgeHost for NullHost {}

    fn test_ctx() -> PluginContext {
        PluginContext::new(Arc::new(NullHost), Arc::new(Preferences::new()))
    }

    /// Records lifecycle deliveries and optionally answers broadcasts.
    #[derive(Default)]
    struct ProbePlugin {
        name: &'static str,
        pauses: AtomicUsize,
        destroys: AtomicUsize,
        answer: Option<Value>,
        fail_destroy: bool,
        intercept: bool,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl BridgePlugin for ProbePlugin {
        async fn execute(
            &self,
            _action: &str,
            _args: RawArgs<'_>,
            _channel: CallbackChannel,
        ) -> Result<bool, ExecError> {
            Ok(false)
        }

        fn on_pause(&self, _multitasking: bool) {
            self.pauses.fetch_add(1, Ordering::SeqCst);
            self.calls.lock().push(self.name);
        }

        fn on_destroy(&self) -> anyhow::Result<()> {
            self.destroys.fetch_add(1, Ordering::SeqCst);
            if self.fail_destroy {
                anyhow::bail!("teardown exploded");
            }
            Ok(())
        }

        fn on_message(&self, _id: &str, _data: &Value) -> Option<Value> {
            self.calls.lock().push(self.name);
            self.answer.clone()
        }

        fn remap_uri(&self, uri: &str) -> Option<String> {
            self.answer
                .as_ref()
                .and_then(Value::as_str)
                .map(|prefix| format!("{prefix}{uri}"))
        }

        fn on_override_url_loading(&self, _url: &str) -> bool {
            self.calls.lock().push(self.name);
            self.intercept
        }
    }

    fn probe(name: &'static str, calls: &Arc<Mutex<Vec<&'static str>>>) -> Arc<ProbePlugin> {
        Arc::new(ProbePlugin {
            name,
            calls: Arc::clone(calls),
            ..Default::default()
        })
    }

    #[test]
    fn lifecycle_reaches_every_live_plugin_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let first = probe("first", &calls);
        let second = probe("second", &calls);

        let registry = PluginRegistry::with_entries(
            test_ctx(),
            vec![
                PluginEntry::from_instance("Second", second.clone()).with_priority(2),
                PluginEntry::from_instance("First", first.clone()).with_priority(1),
            ],
        );

        registry.broadcast_pause(false);
        assert_eq!(*calls.lock(), ["first", "second"]);
        assert_eq!(first.pauses.load(Ordering::SeqCst), 1);
        assert_eq!(second.pauses.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn destroy_failure_does_not_stop_teardown() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let failing = Arc::new(ProbePlugin {
            name: "failing",
            fail_destroy: true,
            calls: Arc::clone(&calls),
            ..Default::default()
        });
        let survivor = probe("survivor", &calls);

        let registry = PluginRegistry::with_entries(
            test_ctx(),
            vec![
                PluginEntry::from_instance("Failing", failing.clone()).with_priority(1),
                PluginEntry::from_instance("Survivor", survivor.clone()).with_priority(2),
            ],
        );

        registry.broadcast_destroy();
        assert_eq!(failing.destroys.load(Ordering::SeqCst), 1);
        assert_eq!(survivor.destroys.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn set_entries_delivers_one_pause_and_one_destroy() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let old = probe("old", &calls);

        let mut registry = PluginRegistry::with_entries(
            test_ctx(),
            vec![PluginEntry::from_instance("Old", old.clone())],
        );

        registry.set_entries(Vec::new());

        assert_eq!(old.pauses.load(Ordering::SeqCst), 1);
        assert_eq!(old.destroys.load(Ordering::SeqCst), 1);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn message_short_circuits_on_first_answer() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let answering = Arc::new(ProbePlugin {
            name: "answering",
            answer: Some(json!("handled")),
            calls: Arc::clone(&calls),
            ..Default::default()
        });
        let never_asked = probe("never_asked", &calls);

        let registry = PluginRegistry::with_entries(
            test_ctx(),
            vec![
                PluginEntry::from_instance("Answering", answering).with_priority(1),
                PluginEntry::from_instance("NeverAsked", never_asked).with_priority(2),
            ],
        );

        let answer = registry.broadcast_message("telemetry", &json!({}));
        assert_eq!(answer, Some(json!("handled")));
        assert_eq!(*calls.lock(), ["answering"]);
    }

    #[test]
    fn remap_returns_first_non_none() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let passive = probe("passive", &calls);
        let remapper = Arc::new(ProbePlugin {
            name: "remapper",
            answer: Some(json!("solder://")),
            calls: Arc::clone(&calls),
            ..Default::default()
        });

        let registry = PluginRegistry::with_entries(
            test_ctx(),
            vec![
                PluginEntry::from_instance("Passive", passive).with_priority(1),
                PluginEntry::from_instance("Remapper", remapper).with_priority(2),
            ],
        );

        assert_eq!(
            registry.remap_uri("asset/logo.png").as_deref(),
            Some("solder://asset/logo.png")
        );
    }

    #[test]
    fn url_filter_match_delegates_to_the_filtered_plugin() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let nav = Arc::new(ProbePlugin {
            name: "nav",
            intercept: true,
            calls: Arc::clone(&calls),
            ..Default::default()
        });

        let mut registry = PluginRegistry::with_entries(
            test_ctx(),
            vec![
                PluginEntry::from_instance("Nav", nav)
                    .with_url_filters(vec!["https://x.example/".to_string()]),
            ],
        );

        assert!(registry.override_url_loading("https://x.example/foo"));
        assert_eq!(*calls.lock(), ["nav"]);

        // A non-matching URL never reaches the filtered plugin.
        calls.lock().clear();
        assert!(!registry.override_url_loading("https://y.example/foo"));
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn unfiltered_plugins_are_consulted_only_when_live() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let live = Arc::new(ProbePlugin {
            name: "live",
            intercept: true,
            calls: Arc::clone(&calls),
            ..Default::default()
        });

        let mut registry = PluginRegistry::with_entries(
            test_ctx(),
            vec![
                // Lazy class entry: no filters, never resolved, so never asked.
                PluginEntry::from_class("Dormant", "NoSuchClass").with_priority(1),
                PluginEntry::from_instance("Live", live).with_priority(2),
            ],
        );

        assert!(registry.override_url_loading("https://anywhere.example/"));
        assert_eq!(*calls.lock(), ["live"]);
        assert!(!registry.is_live("Dormant"));
    }
}
