//! Callback channel — the output sink of a dispatched command.
//!
//! Each `exec` call is bound to a caller-supplied correlation id. The plugin
//! writes zero or more progress results and exactly one terminal result to
//! its [`CallbackChannel`]; the channel routes them to the host-provided
//! [`ResultSink`] keyed by that id.
//!
//! # Thread Safety
//!
//! Registry and dispatch run on one control task, but command completion may
//! happen later from a background task or thread. `CallbackChannel` is
//! `Clone + Send + Sync`; the terminal flag is an atomic shared by all
//! clones, so the at-most-one-terminal guarantee holds across threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tracing::warn;

use crate::result::{PluginResult, ResultStatus};

/// Routes finished results back to the originating caller.
///
/// Implemented by the embedding shell — typically by serializing the result
/// into a script-visible event. Must be safe to call from any thread.
pub trait ResultSink: Send + Sync {
    /// Delivers `result` for the command identified by `correlation_id`.
    fn send(&self, correlation_id: &str, result: PluginResult);
}

/// Result channel for one in-flight command.
#[derive(Clone)]
pub struct CallbackChannel {
    correlation_id: Arc<str>,
    finished: Arc<AtomicBool>,
    sink: Arc<dyn ResultSink>,
}

impl CallbackChannel {
    /// Creates a channel bound to `correlation_id`, writing into `sink`.
    pub fn new(correlation_id: impl Into<Arc<str>>, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            finished: Arc::new(AtomicBool::new(false)),
            sink,
        }
    }

    /// The correlation id this channel reports under.
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Returns `true` once a terminal result has been sent.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Sends `result` through the sink.
    ///
    /// A result with `keep_callback` set leaves the channel open for further
    /// results. After a terminal result, any further send is dropped and
    /// logged — a second terminal completion is a plugin bug, never a fault
    /// raised at the sender.
    pub fn send(&self, result: PluginResult) {
        if result.is_terminal() {
            if self.finished.swap(true, Ordering::SeqCst) {
                warn!(
                    correlation_id = %self.correlation_id,
                    status = %result.status,
                    "Attempted a second terminal result for an already finished callback; dropping"
                );
                return;
            }
        } else if self.finished.load(Ordering::SeqCst) {
            warn!(
                correlation_id = %self.correlation_id,
                "Attempted to send a result on a finished callback; dropping"
            );
            return;
        }
        self.sink.send(&self.correlation_id, result);
    }

    /// Terminal success carrying `payload`.
    pub fn success(&self, payload: Value) {
        self.send(PluginResult::ok(payload));
    }

    /// Terminal success with no payload.
    pub fn success_empty(&self) {
        self.send(PluginResult::status(ResultStatus::Ok));
    }

    /// Non-terminal progress update carrying `payload`.
    pub fn progress(&self, payload: Value) {
        self.send(PluginResult::ok(payload).keep());
    }

    /// Terminal failure carrying `message` as the error text.
    pub fn error(&self, message: impl Into<String>) {
        self.send(PluginResult::error_message(message));
    }
}

impl std::fmt::Debug for CallbackChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackChannel")
            .field("correlation_id", &self.correlation_id)
            .field("finished", &self.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingSink {
        results: Mutex<Vec<(String, PluginResult)>>,
    }

    impl ResultSink for RecordingSink {
        fn send(&self, correlation_id: &str, result: PluginResult) {
            self.results
                .lock()
                .push((correlation_id.to_string(), result));
        }
    }

    fn channel() -> (CallbackChannel, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let channel = CallbackChannel::new("cb42", Arc::clone(&sink) as Arc<dyn ResultSink>);
        (channel, sink)
    }

    #[test]
    fn second_terminal_result_is_dropped() {
        let (channel, sink) = channel();
        channel.success(json!("first"));
        channel.error("second");

        let results = sink.results.lock();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "cb42");
        assert_eq!(results[0].1.status, ResultStatus::Ok);
    }

    #[test]
    fn progress_does_not_finish_the_channel() {
        let (channel, sink) = channel();
        channel.progress(json!(1));
        channel.progress(json!(2));
        assert!(!channel.is_finished());

        channel.success_empty();
        assert!(channel.is_finished());
        assert_eq!(sink.results.lock().len(), 3);
    }

    #[test]
    fn clones_share_the_terminal_flag() {
        let (channel, sink) = channel();
        let clone = channel.clone();
        clone.success_empty();

        channel.success_empty();
        assert_eq!(sink.results.lock().len(), 1);
        assert!(channel.is_finished());
    }

    #[test]
    fn results_after_terminal_are_dropped() {
        let (channel, sink) = channel();
        channel.success_empty();
        channel.progress(json!("late"));
        assert_eq!(sink.results.lock().len(), 1);
    }
}
