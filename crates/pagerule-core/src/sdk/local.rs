//! In-process host implementation.
//!
//! `LocalSdk` backs the CLI and tests: storage lives in memory, logs go to
//! `tracing`, and facades accept calls without talking to any backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use super::{
    EvaluatorFacade, Location, Logger, PluginSdk, SessionFacade, Storage, Tab, TrackerFacade,
    UserFacade,
};
use crate::error::ExtensionError;

/// Separator used when joining a namespace into a single key.
pub const NAMESPACE_SEPARATOR: &str = ".";

/// Root log channel of the local host.
pub const ROOT_CHANNEL: &str = "pagerule";

fn join_namespace(namespace: &[&str]) -> String {
    namespace.join(NAMESPACE_SEPARATOR)
}

// ============================================================================
// Storage
// ============================================================================

/// Thread-safe in-memory key/value storage.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl Storage for InMemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items.write().insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.write().remove(key);
    }

    fn clear(&self) {
        self.items.write().clear();
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.items.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Storage areas keyed by joined namespace, so that asking twice for the
/// same namespace yields the same storage.
#[derive(Debug, Default)]
pub struct StorageAreas {
    areas: Mutex<HashMap<String, Arc<InMemoryStorage>>>,
}

impl StorageAreas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn area(&self, namespace: &[&str]) -> Arc<InMemoryStorage> {
        let key = join_namespace(namespace);
        Arc::clone(self.areas.lock().entry(key).or_default())
    }

    /// Namespaces that have been requested so far, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.areas.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Host logger that forwards to `tracing` with the channel as a field.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    channel: String,
}

impl TracingLogger {
    pub fn new(namespace: &[&str]) -> Self {
        let channel = if namespace.is_empty() {
            ROOT_CHANNEL.to_string()
        } else {
            format!(
                "{ROOT_CHANNEL}{NAMESPACE_SEPARATOR}{}",
                join_namespace(namespace)
            )
        };
        Self { channel }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(channel = %self.channel, "{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!(channel = %self.channel, "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(channel = %self.channel, "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(channel = %self.channel, "{message}");
    }
}

// ============================================================================
// Facades
// ============================================================================

/// Tracker that drops events after logging them.
#[derive(Debug, Default)]
pub struct NoopTracker;

#[async_trait]
impl TrackerFacade for NoopTracker {
    async fn track(
        &self,
        event_type: &str,
        payload: serde_json::Value,
    ) -> Result<(), ExtensionError> {
        tracing::debug!(event_type, %payload, "Dropping tracked event");
        Ok(())
    }
}

/// Evaluator answering every query with a fixed value.
#[derive(Debug)]
pub struct StaticEvaluator {
    answer: serde_json::Value,
}

impl StaticEvaluator {
    pub fn new(answer: serde_json::Value) -> Self {
        Self { answer }
    }
}

impl Default for StaticEvaluator {
    fn default() -> Self {
        Self::new(serde_json::Value::Null)
    }
}

#[async_trait]
impl EvaluatorFacade for StaticEvaluator {
    async fn evaluate(&self, query: &str) -> Result<serde_json::Value, ExtensionError> {
        tracing::debug!(query, "Answering query locally");
        Ok(self.answer.clone())
    }
}

/// Session/user facade keeping attributes in memory.
#[derive(Debug, Default)]
pub struct MemoryProfile {
    anonymous: bool,
    attributes: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryProfile {
    pub fn anonymous() -> Self {
        Self {
            anonymous: true,
            attributes: RwLock::default(),
        }
    }

    pub fn identified() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: &str) -> Option<serde_json::Value> {
        self.attributes.read().get(name).cloned()
    }
}

#[async_trait]
impl SessionFacade for MemoryProfile {
    async fn set_attribute(
        &self,
        name: &str,
        value: serde_json::Value,
    ) -> Result<(), ExtensionError> {
        self.attributes.write().insert(name.to_string(), value);
        Ok(())
    }
}

#[async_trait]
impl UserFacade for MemoryProfile {
    fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    async fn set_attribute(
        &self,
        name: &str,
        value: serde_json::Value,
    ) -> Result<(), ExtensionError> {
        self.attributes.write().insert(name.to_string(), value);
        Ok(())
    }
}

/// Tab whose location only changes through [`StaticTab::navigate`].
#[derive(Debug)]
pub struct StaticTab {
    id: String,
    is_new: bool,
    location: RwLock<Location>,
}

impl StaticTab {
    pub fn new(id: impl Into<String>, location: Location) -> Self {
        Self {
            id: id.into(),
            is_new: true,
            location: RwLock::new(location),
        }
    }

    pub fn navigate(&self, location: Location) {
        *self.location.write() = location;
    }
}

impl Tab for StaticTab {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_new(&self) -> bool {
        self.is_new
    }

    fn location(&self) -> Location {
        self.location.read().clone()
    }
}

// ============================================================================
// LocalSdk
// ============================================================================

/// In-process [`PluginSdk`].
pub struct LocalSdk {
    tracker: Arc<dyn TrackerFacade>,
    evaluator: Arc<dyn EvaluatorFacade>,
    session: Arc<dyn SessionFacade>,
    user: Arc<dyn UserFacade>,
    tab: Arc<StaticTab>,
    tab_storage: StorageAreas,
    browser_storage: StorageAreas,
}

impl LocalSdk {
    /// Host with no-op facades and a tab at `location`.
    pub fn new(location: Location) -> Self {
        Self {
            tracker: Arc::new(NoopTracker),
            evaluator: Arc::new(StaticEvaluator::default()),
            session: Arc::new(MemoryProfile::default()),
            user: Arc::new(MemoryProfile::anonymous()),
            tab: Arc::new(StaticTab::new("local", location)),
            tab_storage: StorageAreas::new(),
            browser_storage: StorageAreas::new(),
        }
    }

    pub fn with_tracker(mut self, tracker: Arc<dyn TrackerFacade>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn EvaluatorFacade>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_session(mut self, session: Arc<dyn SessionFacade>) -> Self {
        self.session = session;
        self
    }

    pub fn with_user(mut self, user: Arc<dyn UserFacade>) -> Self {
        self.user = user;
        self
    }

    /// Move the tab to another location.
    pub fn navigate(&self, location: Location) {
        self.tab.navigate(location);
    }

    pub fn tab_storage_areas(&self) -> &StorageAreas {
        &self.tab_storage
    }

    pub fn browser_storage_areas(&self) -> &StorageAreas {
        &self.browser_storage
    }
}

impl PluginSdk for LocalSdk {
    fn tracker(&self) -> Arc<dyn TrackerFacade> {
        Arc::clone(&self.tracker)
    }

    fn evaluator(&self) -> Arc<dyn EvaluatorFacade> {
        Arc::clone(&self.evaluator)
    }

    fn session(&self) -> Arc<dyn SessionFacade> {
        Arc::clone(&self.session)
    }

    fn user(&self) -> Arc<dyn UserFacade> {
        Arc::clone(&self.user)
    }

    fn tab(&self) -> Arc<dyn Tab> {
        self.tab.clone()
    }

    fn tab_storage(&self, namespace: &[&str]) -> Arc<dyn Storage> {
        self.tab_storage.area(namespace)
    }

    fn browser_storage(&self, namespace: &[&str]) -> Arc<dyn Storage> {
        self.browser_storage.area(namespace)
    }

    fn logger(&self, namespace: &[&str]) -> Arc<dyn Logger> {
        Arc::new(TracingLogger::new(namespace))
    }
}
