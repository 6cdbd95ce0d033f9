//! Plugin factory table.
//!
//! Entries that reference a plugin by class name are materialized through a
//! compile-time registration table instead of runtime reflection: each
//! plugin module contributes one [`PluginFactory`] to the
//! [`PLUGIN_FACTORIES`] distributed slice via [`register_plugin!`], and the
//! registry looks the name up on first use.

use linkme::distributed_slice;

use crate::error::InstantiationError;
use crate::plugin::BoxedPlugin;

/// One registration: a class name and the constructor for its plugin.
pub struct PluginFactory {
    /// Class name entries refer to (e.g. `"EchoPlugin"`).
    pub class: &'static str,
    /// Constructor invoked on first resolution.
    pub create: fn() -> BoxedPlugin,
}

/// Registry of plugin constructors, collected at link time.
///
/// Each crate that defines a plugin contributes entries with
/// [`register_plugin!`]; nothing needs to call a registration function at
/// startup.
#[distributed_slice]
pub static PLUGIN_FACTORIES: [PluginFactory];

/// Looks up the factory registered under `class`.
pub fn find_factory(class: &str) -> Option<&'static PluginFactory> {
    PLUGIN_FACTORIES.iter().find(|f| f.class == class)
}

/// Constructs a plugin from its registered class name.
pub fn instantiate(class: &str) -> Result<BoxedPlugin, InstantiationError> {
    if class.is_empty() {
        return Err(InstantiationError::MissingClass);
    }
    find_factory(class)
        .map(|factory| (factory.create)())
        .ok_or_else(|| InstantiationError::UnknownClass(class.to_string()))
}

/// Registers a plugin constructor under a class name.
///
/// The first argument names the generated static (must be unique within the
/// registering module), the second is the class name entries refer to, and
/// the third is a path to a `fn() -> BoxedPlugin`.
///
/// ```rust,ignore
/// fn make_echo() -> BoxedPlugin {
///     Arc::new(EchoPlugin::default())
/// }
///
/// register_plugin!(ECHO_PLUGIN, "EchoPlugin", make_echo);
/// ```
#[macro_export]
macro_rules! register_plugin {
    ($registration:ident, $class:expr, $create:path) => {
        #[$crate::linkme::distributed_slice($crate::factory::PLUGIN_FACTORIES)]
        #[linkme(crate = $crate::linkme)]
        static $registration: $crate::factory::PluginFactory = $crate::factory::PluginFactory {
            class: $class,
            create: $create,
        };
    };
}
