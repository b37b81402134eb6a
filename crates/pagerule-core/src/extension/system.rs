//! The extension contract.
//!
//! Every hook is optional. An extension that only cares about lifecycle
//! implements `enable`/`disable`; one that only gates rules implements
//! `predicate` (and `variables` if its predicates reference any); one that
//! acts on rules implements `apply`.

use std::sync::Arc;

use crate::error::ExtensionError;
use crate::predicate::{Predicate, Variables};
use crate::rule::Rule;
use crate::sdk::PluginSdk;

/// Result type for extension hooks.
pub type Result<T> = std::result::Result<T, ExtensionError>;

/// Shared handle to a live extension.
pub type DynExtension = Arc<dyn Extension>;

/// A pluggable capability provider.
///
/// One instance exists per extension name per engine, shared across every
/// hook call for the engine's lifetime, so hooks take `&self` and keep any
/// mutable state behind interior mutability.
#[async_trait::async_trait]
pub trait Extension: Send + Sync {
    /// Called when the engine is enabled, before rules are matched.
    async fn enable(&self) -> Result<()> {
        Ok(())
    }

    /// Called when the engine is disabled.
    async fn disable(&self) -> Result<()> {
        Ok(())
    }

    /// This extension's condition for `rule`.
    ///
    /// Variables in the returned predicate are resolved against
    /// [`Extension::variables`] of this same extension.
    fn predicate(&self, _rule: &Rule) -> Predicate {
        Predicate::always()
    }

    /// Resolvers for the variables this extension's predicates reference.
    fn variables(&self) -> Variables {
        Variables::new()
    }

    /// Act on a rule whose combined predicate held.
    async fn apply(&self, _rule: &Rule, _context: &ApplyContext) -> Result<()> {
        Ok(())
    }

    /// Ordering key; lower runs first.
    fn priority(&self) -> i32 {
        0
    }
}

/// Where an applied rule was matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyContext {
    /// Origin-less location the sweep ran against.
    pub location: String,
    /// Page pattern that matched the location.
    pub pattern: String,
    /// Index of the rule group within the pattern's groups.
    pub group: usize,
}

/// What a factory receives when the engine instantiates an extension.
#[derive(Clone)]
pub struct ExtensionContext {
    /// Registered name of the extension.
    pub name: String,
    /// Host SDK whose storage and logger are namespaced to this extension.
    pub sdk: Arc<dyn PluginSdk>,
}

impl std::fmt::Debug for ExtensionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionContext")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
