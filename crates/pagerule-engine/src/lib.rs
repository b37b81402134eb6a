//! Rule engine for pagerule.
//!
//! Given [`Definitions`](pagerule_core::Definitions) and a host
//! [`PluginSdk`](pagerule_core::PluginSdk), the engine instantiates the
//! enabled extensions, runs their lifecycle hooks in priority order and,
//! on every `enable()`, applies at most one rule per group of every page
//! pattern matching the current location.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pagerule_core::sdk::local::LocalSdk;
//! use pagerule_core::{Definitions, Extension, Location};
//! use pagerule_engine::RuleEnginePlugin;
//!
//! struct Banner;
//!
//! #[async_trait::async_trait]
//! impl Extension for Banner {}
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     RuleEnginePlugin::extend("banner", |_| Arc::new(Banner));
//!
//!     let definitions = Definitions::from_json_str(
//!         r#"{"extensions": {"banner": true}, "pages": {"home": [{"rules": [{"name": "welcome"}]}]}}"#,
//!     )?;
//!     let sdk = Arc::new(LocalSdk::new(Location::from_relative("/homepage")?));
//!
//!     let engine = RuleEnginePlugin::new(definitions, sdk)?;
//!     engine.enable().await?;
//!     engine.disable().await;
//!
//!     Ok(())
//! }
//! ```

mod condition;
pub mod error;
pub mod instances;
pub mod matcher;
pub mod plugin;

pub use error::{EngineError, Result};
pub use instances::{ExtensionInstances, LiveExtension};
pub use matcher::{AppliedRule, MatchReport, RuleMatcher};
pub use plugin::{EngineState, RuleEnginePlugin};
