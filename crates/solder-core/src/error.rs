//! Unified error types for the Solder core.
//!
//! Command-path failures never surface to the dispatcher's caller as raised
//! faults; they are converted into [`PluginResult`](crate::result::PluginResult)s.
//! These types exist so the conversion has something precise to match on.

use thiserror::Error;

/// Errors raised while materializing a plugin from its class reference.
///
/// Instantiation failures are logged at resolution time and reported to the
/// command caller as a service-not-found result, never as a raised fault.
#[derive(Debug, Error)]
pub enum InstantiationError {
    /// The entry carried an empty class name.
    #[error("plugin entry has an empty class name")]
    MissingClass,

    /// No factory was registered under the given class name.
    #[error("no registered factory for plugin class '{0}'")]
    UnknownClass(String),
}

/// Errors a plugin's command handler may return from
/// [`execute`](crate::plugin::BridgePlugin::execute).
///
/// The dispatcher maps each variant onto a result status:
/// [`Args`](Self::Args) becomes a JSON-error result, everything else becomes
/// a generic error result carrying the failure's message text.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The serialized argument array could not be deserialized, or an
    /// argument had an unexpected shape.
    #[error("malformed arguments: {0}")]
    Args(String),

    /// Any other failure escaping the plugin's handler.
    #[error(transparent)]
    Plugin(#[from] anyhow::Error),
}

impl ExecError {
    /// Creates an argument error with the given reason.
    pub fn args(reason: impl Into<String>) -> Self {
        Self::Args(reason.into())
    }

    /// Creates a generic plugin failure from a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Plugin(anyhow::anyhow!(message.into()))
    }
}

impl From<serde_json::Error> for ExecError {
    fn from(err: serde_json::Error) -> Self {
        Self::Args(err.to_string())
    }
}
