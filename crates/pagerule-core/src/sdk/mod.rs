//! Host SDK interfaces.
//!
//! The engine runs inside a host that owns tracking, evaluation, session,
//! user and tab state, plus storage and logging. None of those are
//! implemented here; the engine only calls the operations below and hands
//! the same handles to every extension.
//!
//! ```text
//!            ┌──────────────────────────┐
//!            │        PluginSdk         │  host-provided
//!            └──────────────────────────┘
//!                        │
//!        ┌───────────────┼────────────────┐
//!        ▼               ▼                ▼
//!  NamespacedSdk   NamespacedSdk    NamespacedSdk   one per extension,
//!  ("extension",a) ("extension",b)  ("extension",c) same facades
//! ```

pub mod local;
pub mod location;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ExtensionError;

pub use location::Location;

/// Leveled log sink provided by the host.
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// String key/value storage provided by the host.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
    fn clear(&self);
    fn keys(&self) -> Vec<String>;
}

/// Event tracking.
#[async_trait]
pub trait TrackerFacade: Send + Sync {
    async fn track(
        &self,
        event_type: &str,
        payload: serde_json::Value,
    ) -> Result<(), ExtensionError>;
}

/// Remote query evaluation.
#[async_trait]
pub trait EvaluatorFacade: Send + Sync {
    async fn evaluate(&self, query: &str) -> Result<serde_json::Value, ExtensionError>;
}

/// Current session.
#[async_trait]
pub trait SessionFacade: Send + Sync {
    async fn set_attribute(
        &self,
        name: &str,
        value: serde_json::Value,
    ) -> Result<(), ExtensionError>;
}

/// Current user.
#[async_trait]
pub trait UserFacade: Send + Sync {
    fn is_anonymous(&self) -> bool;

    async fn set_attribute(
        &self,
        name: &str,
        value: serde_json::Value,
    ) -> Result<(), ExtensionError>;
}

/// Current browser tab.
pub trait Tab: Send + Sync {
    fn id(&self) -> &str;
    fn is_new(&self) -> bool;
    fn location(&self) -> Location;
}

/// Everything the host exposes to the engine and, through namespacing, to
/// extensions.
///
/// Facade accessors must return the same handle on every call.
pub trait PluginSdk: Send + Sync {
    fn tracker(&self) -> Arc<dyn TrackerFacade>;
    fn evaluator(&self) -> Arc<dyn EvaluatorFacade>;
    fn session(&self) -> Arc<dyn SessionFacade>;
    fn user(&self) -> Arc<dyn UserFacade>;
    fn tab(&self) -> Arc<dyn Tab>;

    /// Storage scoped to the current tab.
    fn tab_storage(&self, namespace: &[&str]) -> Arc<dyn Storage>;

    /// Storage persisted across tabs and sessions.
    fn browser_storage(&self, namespace: &[&str]) -> Arc<dyn Storage>;

    fn logger(&self, namespace: &[&str]) -> Arc<dyn Logger>;
}
