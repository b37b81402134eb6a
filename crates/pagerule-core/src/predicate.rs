//! Predicate algebra.
//!
//! A `Predicate` is an immutable boolean expression an extension returns for
//! a rule. Variables are resolved lazily, and possibly asynchronously, against
//! the `Variables` of the extension that produced the predicate. Combining
//! predicates from several extensions is the engine's job and is not
//! expressible here.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

use crate::error::{ExtensionError, PredicateError};

/// Boolean expression evaluated against a variable-resolution context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Fixed truth value.
    Constant(bool),
    /// Truth value supplied by the named resolver.
    Variable(String),
}

impl Predicate {
    /// Predicate that always holds.
    pub const fn always() -> Self {
        Self::Constant(true)
    }

    /// Predicate that never holds.
    pub const fn never() -> Self {
        Self::Constant(false)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Evaluate this predicate against `variables`.
    ///
    /// A `Variable` whose name is missing from `variables` is reported as
    /// [`PredicateError::UnresolvedVariable`]; it is never coerced to `false`.
    pub async fn evaluate(&self, variables: &Variables) -> Result<bool, PredicateError> {
        match self {
            Self::Constant(value) => Ok(*value),
            Self::Variable(name) => variables.resolve(name).await,
        }
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Self::always()
    }
}

impl From<bool> for Predicate {
    fn from(value: bool) -> Self {
        Self::Constant(value)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => write!(f, "{value}"),
            Self::Variable(name) => write!(f, "${name}"),
        }
    }
}

/// Asynchronous resolver for a single variable.
pub type VariableResolver =
    Arc<dyn Fn() -> BoxFuture<'static, Result<bool, ExtensionError>> + Send + Sync>;

/// Variable-resolution context supplied by one extension.
#[derive(Clone, Default)]
pub struct Variables {
    resolvers: HashMap<String, VariableResolver>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolver, replacing any previous one with the same name.
    pub fn insert<F, Fut>(&mut self, name: impl Into<String>, resolver: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, ExtensionError>> + Send + 'static,
    {
        let boxed: VariableResolver = Arc::new(move || resolver().boxed());
        self.resolvers.insert(name.into(), boxed);
    }

    /// Builder form of [`Variables::insert`].
    pub fn with<F, Fut>(mut self, name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, ExtensionError>> + Send + 'static,
    {
        self.insert(name, resolver);
        self
    }

    /// Register a variable with a fixed value.
    pub fn with_value(self, name: impl Into<String>, value: bool) -> Self {
        self.with(name, move || async move { Ok(value) })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolvers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resolvers.keys().map(String::as_str)
    }

    /// Run the resolver registered under `name`.
    pub async fn resolve(&self, name: &str) -> Result<bool, PredicateError> {
        let resolver = self
            .resolvers
            .get(name)
            .ok_or_else(|| PredicateError::UnresolvedVariable {
                name: name.to_string(),
            })?;

        resolver()
            .await
            .map_err(|source| PredicateError::ResolutionFailed {
                name: name.to_string(),
                source,
            })
    }
}

impl fmt::Debug for Variables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Variables").field("names", &names).finish()
    }
}
