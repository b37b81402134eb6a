//! Core types for pagerule.
//!
//! This crate holds what both the engine and extensions need to agree on:
//! the predicate algebra, the rule and definitions model, the host SDK
//! interfaces and the extension contract. The orchestration itself lives in
//! `pagerule-engine`.

pub mod config;
pub mod definitions;
pub mod error;
pub mod extension;
pub mod predicate;
pub mod rule;
pub mod sdk;

pub use definitions::{CompiledPage, Definitions, ExtensionToggles, OrderedMap, PageDefinition};
pub use error::{DefinitionError, Error, ExtensionError, PredicateError, Result};
pub use extension::{
    ApplyContext, DynExtension, Extension, ExtensionContext, ExtensionFactory, ExtensionRegistry,
    NamespacedSdk,
};
pub use predicate::{Predicate, VariableResolver, Variables};
pub use rule::{Rule, RuleGroup, RuleProperties};
pub use sdk::{Location, Logger, PluginSdk, Storage};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::definitions::Definitions;
    pub use crate::error::{Error, ExtensionError, PredicateError, Result};
    pub use crate::extension::{ApplyContext, Extension, ExtensionContext, ExtensionRegistry};
    pub use crate::predicate::{Predicate, Variables};
    pub use crate::rule::{Rule, RuleGroup};
    pub use crate::sdk::{Location, Logger, PluginSdk, Storage};
}
