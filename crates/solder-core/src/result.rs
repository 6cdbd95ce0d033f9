//! Command outcome model.
//!
//! Every dispatched command terminates in exactly one terminal
//! [`PluginResult`] delivered through the caller's
//! [`CallbackChannel`](crate::channel::CallbackChannel). Results carry a
//! [`ResultStatus`], an arbitrary JSON payload, and a `keep_callback` flag
//! that marks non-terminal progress updates.

use serde_json::{Value, json};

/// Outcome classification carried by every [`PluginResult`].
///
/// The numeric codes are part of the wire contract with the scripting side
/// and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultStatus {
    /// The command produced no result (typically paired with
    /// `keep_callback` to defer completion).
    NoResult,
    /// The command succeeded.
    Ok,
    /// No plugin is configured or constructible for the requested service.
    ClassNotFound,
    /// The plugin refused access to the requested capability.
    IllegalAccess,
    /// The plugin could not be constructed.
    Instantiation,
    /// A locator argument was malformed.
    MalformedUrl,
    /// An I/O operation inside the plugin failed.
    IoError,
    /// The plugin does not recognize the requested action.
    InvalidAction,
    /// The serialized arguments could not be deserialized.
    JsonError,
    /// Generic failure; the payload carries the message text.
    Error,
}

impl ResultStatus {
    /// Numeric wire code for this status.
    pub fn code(self) -> u8 {
        match self {
            Self::NoResult => 0,
            Self::Ok => 1,
            Self::ClassNotFound => 2,
            Self::IllegalAccess => 3,
            Self::Instantiation => 4,
            Self::MalformedUrl => 5,
            Self::IoError => 6,
            Self::InvalidAction => 7,
            Self::JsonError => 8,
            Self::Error => 9,
        }
    }

    /// Default human-readable message for this status.
    pub fn message(self) -> &'static str {
        match self {
            Self::NoResult => "No result",
            Self::Ok => "OK",
            Self::ClassNotFound => "Class not found",
            Self::IllegalAccess => "Illegal access",
            Self::Instantiation => "Instantiation error",
            Self::MalformedUrl => "Malformed url",
            Self::IoError => "IO error",
            Self::InvalidAction => "Invalid action",
            Self::JsonError => "JSON error",
            Self::Error => "Error",
        }
    }

    /// Returns `true` for [`Ok`](Self::Ok) and [`NoResult`](Self::NoResult).
    pub fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::NoResult)
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// One result record delivered through a callback channel.
#[derive(Debug, Clone)]
pub struct PluginResult {
    /// Outcome classification.
    pub status: ResultStatus,
    /// Result payload; for error statuses this is the message text.
    pub payload: Value,
    /// When `true` the channel stays open for further results.
    pub keep_callback: bool,
}

impl PluginResult {
    /// A successful result carrying `payload`.
    pub fn ok(payload: Value) -> Self {
        Self {
            status: ResultStatus::Ok,
            payload,
            keep_callback: false,
        }
    }

    /// A result with the given status and its default message as payload.
    pub fn status(status: ResultStatus) -> Self {
        Self {
            status,
            payload: Value::String(status.message().to_string()),
            keep_callback: false,
        }
    }

    /// A deferred-completion marker: no result yet, channel kept open.
    pub fn no_result() -> Self {
        Self::status(ResultStatus::NoResult).keep()
    }

    /// A generic error result carrying `message` as payload.
    pub fn error_message(message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Error,
            payload: Value::String(message.into()),
            keep_callback: false,
        }
    }

    /// Marks this result as non-terminal (keeps the channel open).
    pub fn keep(mut self) -> Self {
        self.keep_callback = true;
        self
    }

    /// A result is terminal unless it asks to keep the callback alive.
    pub fn is_terminal(&self) -> bool {
        !self.keep_callback
    }

    /// Wire form routed back to the originating caller.
    pub fn to_json(&self) -> Value {
        json!({
            "status": self.status.code(),
            "message": self.payload,
            "keepCallback": self.keep_callback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_stable() {
        assert_eq!(ResultStatus::NoResult.code(), 0);
        assert_eq!(ResultStatus::Ok.code(), 1);
        assert_eq!(ResultStatus::ClassNotFound.code(), 2);
        assert_eq!(ResultStatus::InvalidAction.code(), 7);
        assert_eq!(ResultStatus::JsonError.code(), 8);
        assert_eq!(ResultStatus::Error.code(), 9);
    }

    #[test]
    fn status_result_uses_default_message() {
        let result = PluginResult::status(ResultStatus::InvalidAction);
        assert_eq!(result.payload, Value::String("Invalid action".into()));
        assert!(result.is_terminal());
    }

    #[test]
    fn no_result_keeps_channel_open() {
        let result = PluginResult::no_result();
        assert_eq!(result.status, ResultStatus::NoResult);
        assert!(!result.is_terminal());
    }

    #[test]
    fn wire_form_shape() {
        let wire = PluginResult::ok(json!({"answer": 42})).to_json();
        assert_eq!(wire["status"], 1);
        assert_eq!(wire["message"]["answer"], 42);
        assert_eq!(wire["keepCallback"], false);
    }
}
