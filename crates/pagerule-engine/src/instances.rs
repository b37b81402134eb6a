//! Live extension table.
//!
//! Built once per engine from the enabled names in the definitions. Every
//! extension gets its own [`NamespacedSdk`]; unknown names are reported
//! through the host logger and left out.

use std::sync::Arc;

use pagerule_core::{
    Definitions, DynExtension, ExtensionContext, ExtensionError, ExtensionRegistry, Logger,
    NamespacedSdk, PluginSdk,
};

/// An instantiated extension with its cached priority.
#[derive(Clone)]
pub struct LiveExtension {
    name: String,
    priority: i32,
    extension: DynExtension,
}

impl LiveExtension {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn extension(&self) -> &DynExtension {
        &self.extension
    }
}

impl std::fmt::Debug for LiveExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveExtension")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Extensions of one engine, sorted by ascending priority.
#[derive(Debug, Clone, Default)]
pub struct ExtensionInstances {
    live: Vec<LiveExtension>,
    unknown: Vec<String>,
}

impl ExtensionInstances {
    /// Instantiate every enabled extension.
    ///
    /// Factories run exactly once each, in definition order. The resulting
    /// list is stable-sorted by priority so ties keep definition order.
    pub fn materialize(
        definitions: &Definitions,
        registry: &ExtensionRegistry,
        sdk: &Arc<dyn PluginSdk>,
    ) -> Self {
        let mut live = Vec::new();
        let mut unknown = Vec::new();

        for name in definitions.enabled_extensions() {
            let Some(factory) = registry.resolve(name) else {
                sdk.logger(&[])
                    .error(&format!("Unknown extension \"{name}\"."));
                unknown.push(name.to_string());
                continue;
            };

            let context = ExtensionContext {
                name: name.to_string(),
                sdk: Arc::new(NamespacedSdk::new(name, Arc::clone(sdk))),
            };
            let extension = factory(context);
            let priority = extension.priority();

            tracing::debug!(extension = %name, priority, "Instantiated extension");
            live.push(LiveExtension {
                name: name.to_string(),
                priority,
                extension,
            });
        }

        live.sort_by_key(LiveExtension::priority);

        Self { live, unknown }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LiveExtension> {
        self.live.iter()
    }

    /// Names in priority order.
    pub fn names(&self) -> Vec<&str> {
        self.live.iter().map(LiveExtension::name).collect()
    }

    /// Enabled names that had no registered factory.
    pub fn unknown(&self) -> &[String] {
        &self.unknown
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl<'a> IntoIterator for &'a ExtensionInstances {
    type Item = &'a LiveExtension;
    type IntoIter = std::slice::Iter<'a, LiveExtension>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Report a failed hook without interrupting its siblings.
pub(crate) fn report_hook_failure(
    logger: &dyn Logger,
    extension: &str,
    hook: &str,
    error: &ExtensionError,
) {
    logger.error(&format!("Extension \"{extension}\" failed to {hook}: {error}"));
    tracing::warn!(extension, hook, error = %error, "Extension hook failed");
}
