//! Rule engine plugin.
//!
//! `RuleEnginePlugin` owns the definitions and drives extensions through
//! their lifecycle:
//!
//! ```text
//!   Disabled ──enable()──▶ Enabling ──▶ Enabled
//!      ▲                                  │
//!      └──────── Disabling ◀──disable()───┘
//! ```
//!
//! `enable()` calls every extension's `enable` hook in priority order and
//! then runs one matching sweep against the tab's current location.
//! `disable()` calls every `disable` hook in priority order. Lifecycle calls
//! on one engine are serialized.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::Mutex;

use pagerule_core::{
    CompiledPage, Definitions, DynExtension, ExtensionContext, ExtensionRegistry, Logger,
    PluginSdk,
};

use crate::error::Result;
use crate::instances::{report_hook_failure, ExtensionInstances};
use crate::matcher::{MatchReport, RuleMatcher};

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Disabled,
    Enabling,
    Enabled,
    Disabling,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Disabled => "disabled",
            Self::Enabling => "enabling",
            Self::Enabled => "enabled",
            Self::Disabling => "disabling",
        };
        f.write_str(s)
    }
}

#[derive(Default)]
struct Lifecycle {
    instances: Option<Arc<ExtensionInstances>>,
    /// State reached by the last completed lifecycle call; `None` until one
    /// completes.
    settled: Option<EngineState>,
}

/// Page-targeting rule engine.
pub struct RuleEnginePlugin {
    definitions: Definitions,
    pages: Vec<CompiledPage>,
    sdk: Arc<dyn PluginSdk>,
    logger: Arc<dyn Logger>,
    registry: Arc<ExtensionRegistry>,
    lifecycle: Mutex<Lifecycle>,
    state: RwLock<EngineState>,
    last_report: RwLock<Option<MatchReport>>,
}

impl RuleEnginePlugin {
    /// Create an engine resolving extensions from the global registry.
    ///
    /// Page patterns are compiled here, so an invalid pattern fails
    /// construction rather than the first sweep.
    pub fn new(definitions: Definitions, sdk: Arc<dyn PluginSdk>) -> Result<Self> {
        Self::with_registry(definitions, sdk, ExtensionRegistry::global())
    }

    /// Create an engine resolving extensions from `registry`.
    pub fn with_registry(
        definitions: Definitions,
        sdk: Arc<dyn PluginSdk>,
        registry: Arc<ExtensionRegistry>,
    ) -> Result<Self> {
        let pages = definitions.compile_pages()?;
        let logger = sdk.logger(&[]);

        tracing::debug!(
            patterns = pages.len(),
            extensions = definitions.extensions.len(),
            "Created rule engine"
        );

        Ok(Self {
            definitions,
            pages,
            sdk,
            logger,
            registry,
            lifecycle: Mutex::new(Lifecycle::default()),
            state: RwLock::new(EngineState::Disabled),
            last_report: RwLock::new(None),
        })
    }

    /// Register an extension factory in the global registry.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn extend<F>(name: impl Into<String>, factory: F)
    where
        F: Fn(ExtensionContext) -> DynExtension + Send + Sync + 'static,
    {
        ExtensionRegistry::global().register(name, factory);
    }

    pub fn state(&self) -> EngineState {
        *self.state.read()
    }

    /// Outcome of the most recent successful sweep.
    pub fn last_report(&self) -> Option<MatchReport> {
        self.last_report.read().clone()
    }

    /// Names of the live extensions in priority order, instantiating them if
    /// needed.
    pub async fn extensions(&self) -> Vec<String> {
        let mut lifecycle = self.lifecycle.lock().await;
        self.instances(&mut lifecycle)
            .names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Enable every extension, then run one matching sweep.
    ///
    /// Hook failures are logged and do not stop the sequence. If the engine
    /// is already enabled only the sweep runs again. Fails when a predicate
    /// cannot be evaluated.
    pub async fn enable(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.lock().await;
        let instances = self.instances(&mut lifecycle);

        if lifecycle.settled == Some(EngineState::Enabled) {
            tracing::debug!("Engine already enabled, re-running sweep");
            return self.sweep(&instances).await;
        }

        self.set_state(EngineState::Enabling);
        for live in instances.iter() {
            if let Err(e) = live.extension().enable().await {
                report_hook_failure(self.logger.as_ref(), live.name(), "enable", &e);
            }
        }
        lifecycle.settled = Some(EngineState::Enabled);
        self.set_state(EngineState::Enabled);
        tracing::info!(extensions = instances.len(), "Rule engine enabled");

        self.sweep(&instances).await
    }

    /// Disable every extension.
    ///
    /// A second call after a completed disable does nothing.
    pub async fn disable(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        if lifecycle.settled == Some(EngineState::Disabled) {
            tracing::debug!("Engine already disabled");
            return;
        }
        let instances = self.instances(&mut lifecycle);

        self.set_state(EngineState::Disabling);
        for live in instances.iter() {
            if let Err(e) = live.extension().disable().await {
                report_hook_failure(self.logger.as_ref(), live.name(), "disable", &e);
            }
        }
        lifecycle.settled = Some(EngineState::Disabled);
        self.set_state(EngineState::Disabled);
        tracing::info!(extensions = instances.len(), "Rule engine disabled");
    }

    fn instances(&self, lifecycle: &mut Lifecycle) -> Arc<ExtensionInstances> {
        let instances = lifecycle.instances.get_or_insert_with(|| {
            Arc::new(ExtensionInstances::materialize(
                &self.definitions,
                &self.registry,
                &self.sdk,
            ))
        });
        Arc::clone(instances)
    }

    async fn sweep(&self, instances: &ExtensionInstances) -> Result<()> {
        let location = self.sdk.tab().location().relative();
        let matcher = RuleMatcher::new(&self.pages, instances, self.logger.as_ref());

        match matcher.sweep(&location).await {
            Ok(report) => {
                tracing::debug!(
                    location = %report.location,
                    applied = report.applied.len(),
                    "Sweep finished"
                );
                *self.last_report.write() = Some(report);
                Ok(())
            }
            Err(e) => {
                tracing::error!(location = %location, error = %e, "Sweep abandoned");
                *self.last_report.write() = None;
                Err(e)
            }
        }
    }

    fn set_state(&self, state: EngineState) {
        *self.state.write() = state;
    }
}

impl std::fmt::Debug for RuleEnginePlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEnginePlugin")
            .field("patterns", &self.pages.len())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
