//! Rule matching.
//!
//! One sweep walks every page pattern that matches the location, in
//! definition order, and applies at most one rule per group: the first
//! whose combined predicate holds.

use serde::Serialize;

use pagerule_core::{
    ApplyContext, CompiledPage, Logger, Predicate, PredicateError, Rule, Variables,
};

use crate::condition::{Condition, ConditionFailure};
use crate::error::{EngineError, Result};
use crate::instances::{report_hook_failure, ExtensionInstances};

/// A rule that was applied during a sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedRule {
    pub pattern: String,
    pub group: usize,
    pub rule: Rule,
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchReport {
    /// Origin-less location the sweep ran against.
    pub location: String,
    /// Patterns that matched, in definition order.
    pub matched_patterns: Vec<String>,
    pub applied: Vec<AppliedRule>,
}

impl MatchReport {
    /// Names of the applied rules, in application order.
    pub fn applied_rules(&self) -> Vec<&str> {
        self.applied.iter().map(|a| a.rule.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Runs sweeps over compiled pages with a fixed set of live extensions.
pub struct RuleMatcher<'a> {
    pages: &'a [CompiledPage],
    extensions: &'a ExtensionInstances,
    logger: &'a dyn Logger,
}

impl<'a> RuleMatcher<'a> {
    pub fn new(
        pages: &'a [CompiledPage],
        extensions: &'a ExtensionInstances,
        logger: &'a dyn Logger,
    ) -> Self {
        Self {
            pages,
            extensions,
            logger,
        }
    }

    /// Pages whose pattern matches `location`, in definition order.
    pub fn matching_pages<'l>(
        &self,
        location: &'l str,
    ) -> impl Iterator<Item = &'a CompiledPage> + 'l
    where
        'a: 'l,
    {
        self.pages.iter().filter(move |page| page.is_match(location))
    }

    /// Run one sweep against `location`.
    ///
    /// Fails if a predicate names a variable its extension never declared;
    /// rules applied before the failure stay applied. A resolver that errors
    /// is logged and only makes the current rule unsatisfied.
    pub async fn sweep(&self, location: &str) -> Result<MatchReport> {
        let mut report = MatchReport {
            location: location.to_string(),
            ..MatchReport::default()
        };
        // Fetched on the first rule evaluated and reused for the whole sweep.
        let mut variables: Option<Vec<Variables>> = None;

        for page in self.matching_pages(location) {
            report.matched_patterns.push(page.pattern().to_string());
            tracing::debug!(pattern = %page.pattern(), location, "Page pattern matched");

            for (group, rules) in page.groups().iter().enumerate() {
                for rule in rules {
                    let predicates: Vec<Predicate> = self
                        .extensions
                        .iter()
                        .map(|live| live.extension().predicate(rule))
                        .collect();

                    let scoped_variables: &Vec<Variables> = variables.get_or_insert_with(|| {
                        self.extensions
                            .iter()
                            .map(|live| live.extension().variables())
                            .collect()
                    });

                    let condition = Condition::all(
                        self.extensions
                            .iter()
                            .zip(predicates)
                            .zip(scoped_variables)
                            .map(|((live, predicate), vars)| {
                                Condition::scoped(live.name(), predicate, vars)
                            }),
                    );

                    let satisfied = match condition {
                        Some(condition) => match condition.evaluate().await {
                            Ok(satisfied) => satisfied,
                            Err(ConditionFailure {
                                extension,
                                source: PredicateError::ResolutionFailed { source, .. },
                            }) => {
                                report_hook_failure(
                                    self.logger,
                                    &extension,
                                    "resolve variables",
                                    &source,
                                );
                                false
                            }
                            Err(failure) => {
                                self.logger.error(&format!(
                                    "Failed to evaluate rule \"{}\" for extension \"{}\": {}",
                                    rule.name, failure.extension, failure.source
                                ));
                                return Err(EngineError::Predicate {
                                    extension: failure.extension,
                                    rule: rule.name.clone(),
                                    pattern: page.pattern().to_string(),
                                    source: failure.source,
                                });
                            }
                        },
                        None => true,
                    };

                    if !satisfied {
                        tracing::debug!(pattern = %page.pattern(), group, rule = %rule.name, "Rule skipped");
                        continue;
                    }

                    let context = ApplyContext {
                        location: location.to_string(),
                        pattern: page.pattern().to_string(),
                        group,
                    };
                    for live in self.extensions {
                        if let Err(e) = live.extension().apply(rule, &context).await {
                            report_hook_failure(self.logger, live.name(), "apply", &e);
                        }
                    }

                    tracing::info!(pattern = %page.pattern(), group, rule = %rule.name, "Rule applied");
                    report.applied.push(AppliedRule {
                        pattern: page.pattern().to_string(),
                        group,
                        rule: rule.clone(),
                    });
                    break;
                }
            }
        }

        Ok(report)
    }
}
