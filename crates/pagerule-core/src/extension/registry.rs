//! Extension registry.
//!
//! Maps extension names to factories. The process-wide instance returned by
//! [`ExtensionRegistry::global`] is what `RuleEnginePlugin::extend` writes
//! to; engines can also be built against a private registry, which keeps
//! tests independent of each other.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use super::system::{DynExtension, ExtensionContext};

/// Builds an extension instance for one engine.
pub type ExtensionFactory = Arc<dyn Fn(ExtensionContext) -> DynExtension + Send + Sync>;

/// Name → factory table.
#[derive(Default)]
pub struct ExtensionRegistry {
    factories: RwLock<HashMap<String, ExtensionFactory>>,
}

impl ExtensionRegistry {
    /// Create an empty, private registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the process-wide registry.
    pub fn global() -> Arc<Self> {
        static REGISTRY: OnceLock<Arc<ExtensionRegistry>> = OnceLock::new();
        Arc::clone(REGISTRY.get_or_init(|| Arc::new(Self::new())))
    }

    /// Register a factory. A later registration under the same name replaces
    /// the earlier one.
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(ExtensionContext) -> DynExtension + Send + Sync + 'static,
    {
        let name = name.into();
        let replaced = self
            .factories
            .write()
            .insert(name.clone(), Arc::new(factory))
            .is_some();
        tracing::debug!(extension = %name, replaced, "Registered extension factory");
    }

    /// Look up the factory registered under `name`.
    pub fn resolve(&self, name: &str) -> Option<ExtensionFactory> {
        self.factories.read().get(name).cloned()
    }

    /// Remove a single factory.
    pub fn unregister(&self, name: &str) -> bool {
        self.factories.write().remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.read().is_empty()
    }

    /// Forget every factory.
    pub fn clear(&self) {
        self.factories.write().clear();
    }
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("names", &self.names())
            .finish()
    }
}
