//! Error types for the engine crate.

use pagerule_core::{DefinitionError, PredicateError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid definitions: {0}")]
    Definition(#[from] DefinitionError),

    /// A predicate named a variable its extension never declared; the sweep
    /// was abandoned.
    #[error("Extension \"{extension}\" failed on rule \"{rule}\" (pattern \"{pattern}\"): {source}")]
    Predicate {
        extension: String,
        rule: String,
        pattern: String,
        #[source]
        source: PredicateError,
    },
}

impl EngineError {
    /// Name of the extension that caused the failure, if any.
    pub fn extension(&self) -> Option<&str> {
        match self {
            Self::Predicate { extension, .. } => Some(extension),
            Self::Definition(_) => None,
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
