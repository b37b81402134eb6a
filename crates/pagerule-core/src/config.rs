//! Shared defaults and environment variable names.
//!
//! Kept in one place so the engine and the CLI agree on them.

/// Default definitions file looked up by the CLI when none is given.
pub const DEFAULT_DEFINITIONS_FILE: &str = "pagerule.json";

/// Logging defaults.
pub mod logging {
    /// Filter used when neither `PAGERULE_LOG` nor `RUST_LOG` is set.
    pub const DEFAULT_FILTER: &str = "pagerule=info";
}

/// Environment variable names.
pub mod env_vars {
    use super::logging;

    /// Log filter, takes precedence over `RUST_LOG`.
    pub const LOG: &str = "PAGERULE_LOG";
    pub const RUST_LOG: &str = "RUST_LOG";
    /// `true`/`1` switches log output to JSON lines.
    pub const LOG_JSON: &str = "PAGERULE_LOG_JSON";
    /// Definitions file used when the CLI is not given one.
    pub const DEFINITIONS: &str = "PAGERULE_DEFINITIONS";

    /// Log filter from the environment, or the default.
    pub fn log_filter() -> String {
        std::env::var(LOG)
            .or_else(|_| std::env::var(RUST_LOG))
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| logging::DEFAULT_FILTER.to_string())
    }

    /// Whether JSON log output was requested.
    pub fn log_json() -> bool {
        std::env::var(LOG_JSON)
            .map(|s| is_truthy(&s))
            .unwrap_or(false)
    }

    /// Definitions path from the environment, or the default file name.
    pub fn definitions_path() -> std::path::PathBuf {
        std::env::var(DEFINITIONS)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| super::DEFAULT_DEFINITIONS_FILE.to_string())
            .into()
    }

    pub(crate) fn is_truthy(value: &str) -> bool {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    }
}
