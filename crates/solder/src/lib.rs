//! # Solder
//!
//! An embeddable native↔script bridge for Rust hosts.
//!
//! ## Overview
//!
//! Solder manages an ordered set of named plugin services on behalf of a
//! host shell that embeds a scripting surface. Script-side calls arrive as
//! `exec(service, action, correlationId, args)` messages; Solder resolves
//! the service to a lazily-constructed plugin, invokes it, and routes every
//! outcome back through a host-provided sink. Lifecycle signals and named
//! messages fan out to all live plugins in priority order.
//!
//! ```text
//! ┌────────────┐  exec / lifecycle  ┌───────────────┐  priority order  ┌──────────┐
//! │ host shell │───────────────────▶│ BridgeManager │─────────────────▶│ plugins  │
//! └────────────┘                    └───────┬───────┘                  └────┬─────┘
//!       ▲                                   │                               │
//!       └────────── ResultSink ◀────────────┴──────── CallbackChannel ◀─────┘
//! ```
//!
//! - **Plugins** implement [`BridgePlugin`](solder_core::BridgePlugin) and
//!   register a constructor with
//!   [`register_plugin!`](solder_core::register_plugin).
//! - **Entries** ([`PluginEntry`](solder_core::PluginEntry)) name a service,
//!   its class or instance, a priority, an eager-start flag, and optional
//!   legacy URL filters; they typically come from `solder.toml`.
//! - **The manager** ([`BridgeManager`](solder_runtime::BridgeManager)) owns
//!   the registry on the host's control task.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solder::prelude::*;
//!
//! let cfg = load_config()?;
//! solder::runtime::logging::init_from_config(&cfg.logging);
//!
//! let mut bridge = BridgeManager::with_entries(
//!     host,                       // Arc<dyn BridgeHost>
//!     sink,                       // Arc<dyn ResultSink>
//!     cfg.build_preferences(),
//!     cfg.plugin_entries(),
//! );
//! bridge.init();
//! bridge.exec("Echo", "echo", "cb1", r#"["hello"]"#).await;
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `json-log`: JSON log output

pub use solder_core as core;
pub use solder_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use solder::prelude::*;
/// ```
pub mod prelude {
    // Manager - main entry point
    pub use solder_runtime::{BridgeManager, PluginRegistry};

    // Plugin capability surface
    pub use solder_core::{
        BoxedPlugin, BridgePlugin, CallbackChannel, CommandArgs, ExecError, RawArgs,
        register_plugin,
    };

    // Descriptors and context
    pub use solder_core::{
        BridgeHost, ExternalIntent, PluginContext, PluginEntry, PluginSource, Preferences,
    };

    // Results
    pub use solder_core::{PluginResult, ResultStatus, ResultSink};

    // Configuration
    pub use solder_runtime::config::{BridgeConfig, ConfigLoader, load_config};
}
