//! Demo plugins: an echo service and a device-info service.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use solder::prelude::*;
use tracing::info;

/// Echoes arguments back, either immediately or from a background task.
#[derive(Default)]
pub struct EchoPlugin;

#[async_trait]
impl BridgePlugin for EchoPlugin {
    async fn execute(
        &self,
        action: &str,
        args: RawArgs<'_>,
        channel: CallbackChannel,
    ) -> Result<bool, ExecError> {
        match action {
            "echo" => {
                let args = args.parse()?;
                channel.success(json!(args.str_at(0)?));
                Ok(true)
            }
            // Completes out of band: the hand-off returns immediately and
            // the result arrives later from a background task.
            "delay" => {
                let (millis, message): (u64, String) = args.decode()?;
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(millis)).await;
                    channel.success(json!(message));
                });
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn on_reset(&self) {
        info!("echo plugin reset");
    }
}

fn make_echo() -> BoxedPlugin {
    Arc::new(EchoPlugin)
}

register_plugin!(ECHO_PLUGIN, "EchoPlugin", make_echo);

/// Reports static device facts; configured eager so it can answer
/// broadcasts from the first page load on.
#[derive(Default)]
pub struct DeviceInfoPlugin {
    model: OnceLock<String>,
}

#[async_trait]
impl BridgePlugin for DeviceInfoPlugin {
    fn initialize(&self, ctx: &PluginContext) {
        let model = ctx.preferences().get_str("DeviceModel", "generic");
        info!(model, "device plugin initialized");
        let _ = self.model.set(model);
    }

    async fn execute(
        &self,
        action: &str,
        _args: RawArgs<'_>,
        channel: CallbackChannel,
    ) -> Result<bool, ExecError> {
        if action != "info" {
            return Ok(false);
        }
        channel.success(json!({
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
            "model": self.model.get().map(String::as_str).unwrap_or("generic"),
        }));
        Ok(true)
    }

    fn on_message(&self, id: &str, _data: &Value) -> Option<Value> {
        (id == "device").then(|| json!(std::env::consts::OS))
    }
}

fn make_device_info() -> BoxedPlugin {
    Arc::new(DeviceInfoPlugin::default())
}

register_plugin!(DEVICE_INFO_PLUGIN, "DeviceInfoPlugin", make_device_info);
