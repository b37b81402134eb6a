//! Recording doubles shared by the engine integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use pagerule_core::sdk::local::{
    InMemoryStorage, MemoryProfile, NoopTracker, StaticEvaluator, StaticTab,
};
use pagerule_core::sdk::{
    EvaluatorFacade, Location, Logger, PluginSdk, SessionFacade, Storage, Tab, TrackerFacade,
    UserFacade,
};
use pagerule_core::{
    ApplyContext, Definitions, Extension, ExtensionError, ExtensionRegistry, Predicate, Rule,
    Variables,
};
use pagerule_engine::RuleEnginePlugin;

/// Ordered log of every hook call across all extensions of a test.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Entries for one hook, e.g. `"apply"`, in call order.
    pub fn hook(&self, hook: &str) -> Vec<String> {
        let needle = format!(".{hook}");
        self.entries()
            .into_iter()
            .filter(|e| e.contains(&needle))
            .collect()
    }

    /// Extensions whose `hook` ran, in call order.
    pub fn order(&self, hook: &str) -> Vec<String> {
        self.hook(hook)
            .into_iter()
            .filter_map(|e| e.split('.').next().map(String::from))
            .collect()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.entries().iter().filter(|e| *e == entry).count()
    }
}

// ============================================================================
// Host
// ============================================================================

/// What the host was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    TabStorage(Vec<String>),
    BrowserStorage(Vec<String>),
    Logger(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: &'static str,
    pub namespace: Vec<String>,
    pub message: String,
}

#[derive(Debug)]
pub struct RecordingLogger {
    namespace: Vec<String>,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl RecordingLogger {
    fn record(&self, level: &'static str, message: &str) {
        self.entries.lock().push(LogEntry {
            level,
            namespace: self.namespace.clone(),
            message: message.to_string(),
        });
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, message: &str) {
        self.record("debug", message);
    }

    fn info(&self, message: &str) {
        self.record("info", message);
    }

    fn warn(&self, message: &str) {
        self.record("warn", message);
    }

    fn error(&self, message: &str) {
        self.record("error", message);
    }
}

/// Host SDK recording every namespaced request and every log line.
pub struct RecordingSdk {
    tracker: Arc<dyn TrackerFacade>,
    evaluator: Arc<dyn EvaluatorFacade>,
    session: Arc<dyn SessionFacade>,
    user: Arc<dyn UserFacade>,
    tab: Arc<StaticTab>,
    storage: Arc<InMemoryStorage>,
    calls: Mutex<Vec<SdkCall>>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl RecordingSdk {
    pub fn at(path: &str) -> Arc<Self> {
        let location = Location::from_relative(path).expect("valid test location");
        Arc::new(Self {
            tracker: Arc::new(NoopTracker),
            evaluator: Arc::new(StaticEvaluator::default()),
            session: Arc::new(MemoryProfile::default()),
            user: Arc::new(MemoryProfile::anonymous()),
            tab: Arc::new(StaticTab::new("test", location)),
            storage: Arc::new(InMemoryStorage::new()),
            calls: Mutex::new(Vec::new()),
            logs: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn navigate(&self, path: &str) {
        self.tab
            .navigate(Location::from_relative(path).expect("valid test location"));
    }

    pub fn calls(&self) -> Vec<SdkCall> {
        self.calls.lock().clone()
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.logs()
            .into_iter()
            .filter(|l| l.level == "error")
            .map(|l| l.message)
            .collect()
    }

    fn owned(namespace: &[&str]) -> Vec<String> {
        namespace.iter().map(|s| s.to_string()).collect()
    }
}

impl PluginSdk for RecordingSdk {
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
        self.calls.lock().push(SdkCall::TabStorage(Self::owned(namespace)));
        self.storage.clone()
    }

    fn browser_storage(&self, namespace: &[&str]) -> Arc<dyn Storage> {
        self.calls
            .lock()
            .push(SdkCall::BrowserStorage(Self::owned(namespace)));
        self.storage.clone()
    }

    fn logger(&self, namespace: &[&str]) -> Arc<dyn Logger> {
        self.calls.lock().push(SdkCall::Logger(Self::owned(namespace)));
        Arc::new(RecordingLogger {
            namespace: Self::owned(namespace),
            entries: Arc::clone(&self.logs),
        })
    }
}

// ============================================================================
// Extension
// ============================================================================

/// Extension with scripted answers that logs every hook call.
///
/// Log entries look like `foo.enable`, `foo.predicate(rule)`,
/// `foo.variables`, `foo.apply(rule)`.
pub struct ScriptedExtension {
    name: String,
    log: CallLog,
    priority: i32,
    predicates: Mutex<VecDeque<Predicate>>,
    fallback: Predicate,
    variables: Variables,
    fail_enable: bool,
    fail_disable: bool,
    fail_apply: bool,
    contexts: Mutex<Vec<ApplyContext>>,
}

impl ScriptedExtension {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            priority: 0,
            predicates: Mutex::new(VecDeque::new()),
            fallback: Predicate::always(),
            variables: Variables::new(),
            fail_enable: false,
            fail_disable: false,
            fail_apply: false,
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Answers returned by successive `predicate` calls; `Constant(true)`
    /// once exhausted.
    pub fn predicates(self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates.lock().extend(predicates);
        self
    }

    pub fn fallback(mut self, predicate: Predicate) -> Self {
        self.fallback = predicate;
        self
    }

    pub fn variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    pub fn failing_enable(mut self) -> Self {
        self.fail_enable = true;
        self
    }

    pub fn failing_disable(mut self) -> Self {
        self.fail_disable = true;
        self
    }

    pub fn failing_apply(mut self) -> Self {
        self.fail_apply = true;
        self
    }

    pub fn contexts(&self) -> Vec<ApplyContext> {
        self.contexts.lock().clone()
    }
}

#[async_trait::async_trait]
impl Extension for ScriptedExtension {
    async fn enable(&self) -> Result<(), ExtensionError> {
        self.log.push(format!("{}.enable", self.name));
        if self.fail_enable {
            return Err(ExtensionError::EnableFailed("scripted".to_string()));
        }
        Ok(())
    }

    async fn disable(&self) -> Result<(), ExtensionError> {
        self.log.push(format!("{}.disable", self.name));
        if self.fail_disable {
            return Err(ExtensionError::DisableFailed("scripted".to_string()));
        }
        Ok(())
    }

    fn predicate(&self, rule: &Rule) -> Predicate {
        self.log.push(format!("{}.predicate({})", self.name, rule.name));
        self.predicates
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    fn variables(&self) -> Variables {
        self.log.push(format!("{}.variables", self.name));
        self.variables.clone()
    }

    async fn apply(&self, rule: &Rule, context: &ApplyContext) -> Result<(), ExtensionError> {
        self.log.push(format!("{}.apply({})", self.name, rule.name));
        self.contexts.lock().push(context.clone());
        if self.fail_apply {
            return Err(ExtensionError::ApplyFailed("scripted".to_string()));
        }
        Ok(())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Variable whose resolver logs `<log_as>.resolve(<name>)` before answering.
pub fn logged_variable(log: &CallLog, log_as: &str, name: &str, value: bool) -> Variables {
    let log = log.clone();
    let entry = format!("{log_as}.resolve({name})");
    Variables::new().with(name, move || {
        log.push(entry.clone());
        async move { Ok(value) }
    })
}

// ============================================================================
// Fixtures
// ============================================================================

/// Register `extension` under `name` and return a handle to the instance.
pub fn register(
    registry: &ExtensionRegistry,
    name: &str,
    extension: ScriptedExtension,
) -> Arc<ScriptedExtension> {
    let instance = Arc::new(extension);
    let shared = Arc::clone(&instance);
    registry.register(name, move |_| shared.clone());
    instance
}

pub fn definitions(json: &str) -> Definitions {
    Definitions::from_json_str(json).expect("valid test definitions")
}

pub fn engine(
    definitions: Definitions,
    sdk: &Arc<RecordingSdk>,
    registry: &Arc<ExtensionRegistry>,
) -> RuleEnginePlugin {
    let host: Arc<dyn PluginSdk> = sdk.clone();
    RuleEnginePlugin::with_registry(definitions, host, Arc::clone(registry))
        .expect("valid engine")
}
