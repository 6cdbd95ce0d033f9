//! # Solder Core
//!
//! Core types for the Solder native↔script bridge.
//!
//! This crate provides the building blocks the runtime assembles into a
//! working bridge: the plugin capability trait, the descriptor model, the
//! command-result vocabulary, and the callback channel that carries results
//! back to the scripting side.
//!
//! ## Architecture
//!
//! A host shell embeds the bridge and forwards `exec`-style invocation
//! requests to it. Commands flow one way; results travel back out of band
//! through the sink:
//!
//! ```text
//! ┌────────────┐ exec(service, action, id, args) ┌──────────────┐
//! │ script side│────────────────────────────────▶│ BridgeManager │
//! └────────────┘                                 └──────┬───────┘
//!       ▲                                               │ resolve
//!       │                                        ┌──────▼───────┐
//!       │  PluginResult (via ResultSink)         │ BridgePlugin │
//!       └────────────────────────────────────────│  (per service)│
//!                                                └──────────────┘
//! ```
//!
//! - [`BridgePlugin`] — the capability set a service handler implements;
//!   every hook except `execute` has a default no-op body.
//! - [`PluginEntry`] — describes one named service: how to obtain the
//!   plugin, its broadcast priority, and legacy URL filters.
//! - [`CallbackChannel`] — correlation-id-bound result channel, safe to
//!   complete from any thread, enforcing at most one terminal result.
//! - [`PluginResult`] / [`ResultStatus`] — the wire-level outcome model.
//! - [`PLUGIN_FACTORIES`](factory::PLUGIN_FACTORIES) — the compile-time
//!   registration table mapping class names to constructors; populate it
//!   with [`register_plugin!`].
//!
//! The registry, dispatcher, and broadcast coordination live in
//! `solder-runtime`.

pub mod args;
pub mod channel;
pub mod context;
pub mod entry;
pub mod error;
pub mod factory;
pub mod plugin;
pub mod result;

pub use args::{CommandArgs, RawArgs};
pub use channel::{CallbackChannel, ResultSink};
pub use context::{BridgeHost, ExternalIntent, PluginContext, Preferences};
pub use entry::{PluginEntry, PluginSource};
pub use error::{ExecError, InstantiationError};
pub use factory::{PluginFactory, instantiate};
pub use plugin::{BoxedPlugin, BridgePlugin};
pub use result::{PluginResult, ResultStatus};

// Re-exported for the `register_plugin!` macro expansion.
pub use linkme;
