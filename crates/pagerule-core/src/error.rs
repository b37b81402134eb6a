//! Error types for pagerule.
//!
//! Errors are split by concern: predicate evaluation, extension hooks and
//! definition loading. `Error` aggregates them for callers that only need
//! a single type.

/// Errors raised while evaluating a predicate.
#[derive(Debug, thiserror::Error)]
pub enum PredicateError {
    /// A `Variable` names something the extension never supplied.
    #[error("Unresolved variable \"{name}\"")]
    UnresolvedVariable { name: String },

    /// The resolver for a variable was found but failed.
    #[error("Failed to resolve variable \"{name}\": {source}")]
    ResolutionFailed {
        name: String,
        #[source]
        source: ExtensionError,
    },
}

impl PredicateError {
    /// Name of the variable involved in the failure.
    pub fn variable(&self) -> &str {
        match self {
            Self::UnresolvedVariable { name } | Self::ResolutionFailed { name, .. } => name,
        }
    }
}

/// Errors returned by extension hooks and variable resolvers.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    #[error("Enable failed: {0}")]
    EnableFailed(String),

    #[error("Disable failed: {0}")]
    DisableFailed(String),

    #[error("Apply failed: {0}")]
    ApplyFailed(String),

    #[error("Facade error: {0}")]
    Facade(String),
}

/// Errors raised while loading or validating definitions.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("Invalid page pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Malformed definitions: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read definitions: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid location \"{location}\": {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },
}

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Predicate error: {0}")]
    Predicate(#[from] PredicateError),

    #[error("Extension error: {0}")]
    Extension(#[from] ExtensionError),

    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),
}

/// Result type for pagerule operations.
pub type Result<T> = std::result::Result<T, Error>;
