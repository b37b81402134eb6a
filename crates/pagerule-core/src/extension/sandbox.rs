//! Per-extension view of the host SDK.
//!
//! Extensions see the host's facades unchanged, while storage and logger
//! namespaces are prefixed with `["extension", <name>]` so two extensions
//! never share a storage area or log channel by accident.

use std::sync::Arc;

use crate::sdk::{
    EvaluatorFacade, Logger, PluginSdk, SessionFacade, Storage, Tab, TrackerFacade, UserFacade,
};

/// First namespace segment for everything an extension touches.
pub const EXTENSION_NAMESPACE: &str = "extension";

/// SDK wrapper that scopes storage and logging to one extension.
pub struct NamespacedSdk {
    name: String,
    inner: Arc<dyn PluginSdk>,
}

impl NamespacedSdk {
    pub fn new(name: impl Into<String>, inner: Arc<dyn PluginSdk>) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn scoped<'a>(&'a self, namespace: &[&'a str]) -> Vec<&'a str> {
        let mut scoped = Vec::with_capacity(namespace.len() + 2);
        scoped.push(EXTENSION_NAMESPACE);
        scoped.push(self.name.as_str());
        scoped.extend_from_slice(namespace);
        scoped
    }
}

impl std::fmt::Debug for NamespacedSdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespacedSdk")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PluginSdk for NamespacedSdk {
    fn tracker(&self) -> Arc<dyn TrackerFacade> {
        self.inner.tracker()
    }

    fn evaluator(&self) -> Arc<dyn EvaluatorFacade> {
        self.inner.evaluator()
    }

    fn session(&self) -> Arc<dyn SessionFacade> {
        self.inner.session()
    }

    fn user(&self) -> Arc<dyn UserFacade> {
        self.inner.user()
    }

    fn tab(&self) -> Arc<dyn Tab> {
        self.inner.tab()
    }

    fn tab_storage(&self, namespace: &[&str]) -> Arc<dyn Storage> {
        self.inner.tab_storage(&self.scoped(namespace))
    }

    fn browser_storage(&self, namespace: &[&str]) -> Arc<dyn Storage> {
        self.inner.browser_storage(&self.scoped(namespace))
    }

    fn logger(&self, namespace: &[&str]) -> Arc<dyn Logger> {
        self.inner.logger(&self.scoped(namespace))
    }
}
