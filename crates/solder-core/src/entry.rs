//! Plugin entry — the descriptor for one named service.

use crate::plugin::BoxedPlugin;

/// How the registry obtains the live plugin for an entry.
#[derive(Clone)]
pub enum PluginSource {
    /// A pre-built instance supplied by the embedder.
    Instance(BoxedPlugin),
    /// A class name resolved through the factory table on first use.
    Class(String),
}

impl std::fmt::Debug for PluginSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Instance(..)"),
            Self::Class(name) => f.debug_tuple("Class").field(name).finish(),
        }
    }
}

/// Descriptor for one named plugin service.
///
/// Entries are the registry's canonical ordering unit: the registry keeps
/// them stably sorted by [`priority`](Self::priority) (ascending; insertion
/// order breaks ties) and derives all broadcast ordering from that sort.
///
/// # Example
///
/// ```rust,ignore
/// let entry = PluginEntry::from_class("Device", "DeviceInfoPlugin")
///     .with_priority(10)
///     .eager(true);
/// ```
#[derive(Debug, Clone)]
pub struct PluginEntry {
    /// Unique service key this entry resolves under.
    pub service: String,
    /// Where the live instance comes from.
    pub source: PluginSource,
    /// Broadcast ordering key; lower values are notified first.
    pub priority: i32,
    /// Construct at registry init rather than on first dispatch.
    pub eager: bool,
    /// Legacy URL-prefix routing rules, if any.
    pub url_filters: Option<Vec<String>>,
}

impl PluginEntry {
    /// An entry constructed lazily from a registered class name.
    pub fn from_class(service: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            source: PluginSource::Class(class.into()),
            priority: 0,
            eager: false,
            url_filters: None,
        }
    }

    /// An entry wrapping a pre-built instance.
    pub fn from_instance(service: impl Into<String>, instance: BoxedPlugin) -> Self {
        Self {
            service: service.into(),
            source: PluginSource::Instance(instance),
            priority: 0,
            eager: false,
            url_filters: None,
        }
    }

    /// Sets the broadcast priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the eager-start flag.
    pub fn eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    /// Attaches legacy URL-prefix filters.
    pub fn with_url_filters(mut self, filters: Vec<String>) -> Self {
        self.url_filters = Some(filters);
        self
    }

    /// Returns `true` when any of this entry's filters is a prefix of `url`.
    pub fn matches_url(&self, url: &str) -> bool {
        self.url_filters
            .as_ref()
            .is_some_and(|filters| filters.iter().any(|f| url.starts_with(f.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let entry = PluginEntry::from_class("Echo", "EchoPlugin");
        assert_eq!(entry.priority, 0);
        assert!(!entry.eager);
        assert!(entry.url_filters.is_none());
        assert!(matches!(entry.source, PluginSource::Class(ref c) if c == "EchoPlugin"));
    }

    #[test]
    fn url_filter_prefix_match() {
        let entry = PluginEntry::from_class("Nav", "NavPlugin")
            .with_url_filters(vec!["https://x.example/".to_string()]);
        assert!(entry.matches_url("https://x.example/foo"));
        assert!(!entry.matches_url("https://y.example/foo"));

        let bare = PluginEntry::from_class("Echo", "EchoPlugin");
        assert!(!bare.matches_url("https://x.example/foo"));
    }
}
