//! # Solder Runtime
//!
//! Orchestration layer of the Solder bridge: the plugin registry, the
//! dispatch engine, lifecycle broadcasting, configuration loading, and
//! logging setup.
//!
//! The embedding shell owns a single [`BridgeManager`] on its control task
//! and feeds it `exec` requests and lifecycle notifications; results travel
//! back through the shell's [`ResultSink`](solder_core::ResultSink).
//!
//! ```rust,ignore
//! use solder_runtime::{BridgeManager, config};
//!
//! let cfg = config::load_config()?;
//! solder_runtime::logging::init_from_config(&cfg.logging);
//!
//! let mut bridge =
//!     BridgeManager::with_entries(host, sink, cfg.build_preferences(), cfg.plugin_entries());
//! bridge.init();
//! bridge.exec("Echo", "echo", "cb1", r#"["hello"]"#).await;
//! ```

pub mod config;
pub mod logging;
pub mod manager;
pub mod registry;

mod broadcast;

pub use config::{BridgeConfig, ConfigError, ConfigLoader, ConfigResult, load_config};
pub use manager::BridgeManager;
pub use registry::PluginRegistry;
