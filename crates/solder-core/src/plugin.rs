//! The plugin capability trait.
//!
//! A plugin implements whichever hooks it needs; everything except
//! [`execute`](BridgePlugin::execute) has a default no-op body, so simple
//! plugins stay small and the registry can call any hook on any plugin
//! without capability checks.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::args::RawArgs;
use crate::channel::CallbackChannel;
use crate::context::{ExternalIntent, PluginContext};
use crate::error::ExecError;

/// A live plugin shared between the registry and any background work it spawns.
pub type BoxedPlugin = Arc<dyn BridgePlugin>;

/// Capability set of one named bridge service.
///
/// # Lifecycle
///
/// The registry constructs a plugin (via the factory table or from a
/// provided instance), calls [`initialize`](Self::initialize) exactly once
/// with the execution context, then routes commands and broadcasts to it
/// until teardown or reconfiguration, when [`on_destroy`](Self::on_destroy)
/// runs once.
///
/// # Concurrency
///
/// All hooks are invoked from the bridge's control task. `execute` is the
/// hand-off for one command: it should return promptly, moving slow work to
/// a background task (e.g. `tokio::spawn`) that completes the
/// [`CallbackChannel`] later. Plugins own their state exclusively; use
/// interior mutability for state that changes across calls.
#[async_trait]
pub trait BridgePlugin: Send + Sync {
    /// One-time initialization with the execution context, before first use.
    fn initialize(&self, _ctx: &PluginContext) {}

    /// Handles one command.
    ///
    /// Returns `Ok(true)` when `action` was recognized (the plugin is then
    /// responsible for eventually completing `channel`), `Ok(false)` when it
    /// was not. Errors are converted by the dispatcher into results on the
    /// channel — they never propagate further.
    async fn execute(
        &self,
        action: &str,
        args: RawArgs<'_>,
        channel: CallbackChannel,
    ) -> Result<bool, ExecError>;

    /// The host is about to move to the background.
    fn on_pause(&self, _multitasking: bool) {}

    /// The host returned to the foreground.
    fn on_resume(&self, _multitasking: bool) {}

    /// Final call before the plugin is dropped.
    ///
    /// A returned error is logged by the broadcast path and does not stop
    /// the teardown of the remaining plugins.
    fn on_destroy(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Handles a named broadcast message; non-`None` stops propagation.
    fn on_message(&self, _id: &str, _data: &Value) -> Option<Value> {
        None
    }

    /// The host received a new external event.
    fn on_new_intent(&self, _intent: &ExternalIntent) {}

    /// The content layer navigated or refreshed.
    fn on_reset(&self) {}

    /// Optionally rewrites a resource locator; first non-`None` wins.
    fn remap_uri(&self, _uri: &str) -> Option<String> {
        None
    }

    /// Decides whether the plugin intercepts a navigation to `url`.
    ///
    /// Returning `true` prevents the navigation.
    fn on_override_url_loading(&self, _url: &str) -> bool {
        false
    }
}

impl fmt::Debug for dyn BridgePlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("dyn BridgePlugin").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ResultSink;
    use crate::result::{PluginResult, ResultStatus};
    use parking_lot::Mutex;
    use serde_json::json;

    struct MinimalPlugin;

    #[async_trait]
    impl BridgePlugin for MinimalPlugin {
        async fn execute(
            &self,
            action: &str,
            _args: RawArgs<'_>,
            channel: CallbackChannel,
        ) -> Result<bool, ExecError> {
            if action == "ping" {
                channel.success_empty();
                return Ok(true);
            }
            Ok(false)
        }
    }

    #[test]
    fn default_hooks_are_inert() {
        let plugin = MinimalPlugin;
        assert_eq!(plugin.on_message("any", &json!({})), None);
        assert_eq!(plugin.remap_uri("content://thing"), None);
        assert!(!plugin.on_override_url_loading("https://example.com/"));
        assert!(plugin.on_destroy().is_ok());
    }

    #[derive(Default)]
    struct RecordingSink {
        results: Mutex<Vec<PluginResult>>,
    }

    impl ResultSink for RecordingSink {
        fn send(&self, _correlation_id: &str, result: PluginResult) {
            self.results.lock().push(result);
        }
    }

    #[tokio::test]
    async fn execute_reports_recognition() {
        let plugin = MinimalPlugin;
        let sink = Arc::new(RecordingSink::default());

        let channel = CallbackChannel::new("cb1", Arc::clone(&sink) as Arc<dyn ResultSink>);
        let recognized = plugin
            .execute("ping", RawArgs::new("[]"), channel)
            .await
            .unwrap();
        assert!(recognized);
        assert_eq!(sink.results.lock()[0].status, ResultStatus::Ok);

        let channel = CallbackChannel::new("cb2", Arc::clone(&sink) as Arc<dyn ResultSink>);
        let recognized = plugin
            .execute("warp", RawArgs::new("[]"), channel)
            .await
            .unwrap();
        assert!(!recognized);
    }
}
