//! Echo/Device Demo
//!
//! A console host for the Solder bridge. It wires two plugins (an echo
//! service and a device-info service) to a sink that prints every result as
//! a JSON line, then walks through a typical bridge session: init, a few
//! `exec` calls (including one that completes out of band), a broadcast
//! message, a pause/resume cycle, and teardown.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package echo-device
//! cargo run --package echo-device -- --config demos/echo-device/solder.toml
//! ```

mod plugins;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use serde_json::{Value, json};
use solder::prelude::*;
use solder::runtime::config::{ConfigLoader, load_config_from_file};
use solder::runtime::logging;
use tracing::info;

/// Command-line options.
#[derive(Parser, Debug)]
#[command(name = "echo-device", about = "Console demo host for the Solder bridge")]
struct Cli {
    /// Path to a solder.toml configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Prints every plugin result as one JSON line, the way a real shell would
/// forward it to the scripting side.
struct ConsoleSink;

impl ResultSink for ConsoleSink {
    fn send(&self, correlation_id: &str, result: PluginResult) {
        println!(
            "{}",
            json!({ "callbackId": correlation_id, "result": result.to_json() })
        );
    }
}

/// Host shell that claims the "session" broadcast message for itself.
struct DemoHost;

impl BridgeHost for DemoHost {
    fn on_message(&self, id: &str, _data: &Value) -> Option<Value> {
        (id == "session").then(|| json!({ "host": "echo-device" }))
    }
}

/// Entries used when no configuration file provides any.
fn default_entries() -> Vec<PluginEntry> {
    vec![
        PluginEntry::from_class("Device", "DeviceInfoPlugin")
            .with_priority(1)
            .eager(true),
        PluginEntry::from_class("Echo", "EchoPlugin").with_priority(10),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from_file(path)?,
        None => ConfigLoader::new().with_current_dir().load()?,
    };
    logging::init_from_config(&config.logging);

    let mut entries = config.plugin_entries();
    if entries.is_empty() {
        entries = default_entries();
    }

    let preferences = config.build_preferences();
    preferences.set("DeviceModel", "demo-kiosk");

    let mut bridge = BridgeManager::with_entries(
        Arc::new(DemoHost),
        Arc::new(ConsoleSink),
        preferences,
        entries,
    );

    // First page load: eager plugins come up now.
    bridge.init();

    bridge.exec("Echo", "echo", "cb1", r#"["hello bridge"]"#).await;
    bridge.exec("Device", "info", "cb2", "[]").await;

    // Hand-off returns immediately; the result lands ~200ms later.
    bridge.exec("Echo", "delay", "cb3", r#"[200, "late reply"]"#).await;

    // Error paths still come back as results on the sink.
    bridge.exec("Echo", "unknown-action", "cb4", "[]").await;
    bridge.exec("Gyroscope", "read", "cb5", "[]").await;

    info!(answer = ?bridge.post_message("session", &json!({})), "host-claimed message");
    info!(answer = ?bridge.post_message("device", &json!({})), "plugin-claimed message");

    bridge.on_pause(false);
    bridge.on_resume(false);

    tokio::time::sleep(Duration::from_millis(300)).await;

    bridge.on_destroy();
    Ok(())
}
