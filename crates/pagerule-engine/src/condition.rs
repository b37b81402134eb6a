//! Conjunction of per-extension predicates.
//!
//! Each extension's predicate is only meaningful against that extension's
//! own variables, so a leaf carries both. Conjunctions are built left to
//! right in priority order and evaluation stops at the first false leaf.

use futures::future::BoxFuture;
use futures::FutureExt;

use pagerule_core::{Predicate, PredicateError, Variables};

/// A predicate that could not be evaluated, with the extension it came from.
#[derive(Debug)]
pub(crate) struct ConditionFailure {
    pub(crate) extension: String,
    pub(crate) source: PredicateError,
}

pub(crate) enum Condition<'a> {
    /// One extension's predicate bound to its variables.
    Scoped {
        extension: &'a str,
        predicate: Predicate,
        variables: &'a Variables,
    },
    /// Holds when both sides hold; the right side is not evaluated when the
    /// left side is false.
    Conjunction(Box<Condition<'a>>, Box<Condition<'a>>),
}

impl<'a> Condition<'a> {
    pub(crate) fn scoped(extension: &'a str, predicate: Predicate, variables: &'a Variables) -> Self {
        Self::Scoped {
            extension,
            predicate,
            variables,
        }
    }

    pub(crate) fn and(self, right: Condition<'a>) -> Self {
        Self::Conjunction(Box::new(self), Box::new(right))
    }

    /// Left fold of `conditions` into a conjunction. `None` when empty.
    pub(crate) fn all<I>(conditions: I) -> Option<Self>
    where
        I: IntoIterator<Item = Condition<'a>>,
    {
        conditions.into_iter().reduce(Condition::and)
    }

    pub(crate) fn evaluate(&self) -> BoxFuture<'_, Result<bool, ConditionFailure>> {
        async move {
            match self {
                Self::Scoped {
                    extension,
                    predicate,
                    variables,
                } => predicate
                    .evaluate(variables)
                    .await
                    .map_err(|source| ConditionFailure {
                        extension: (*extension).to_string(),
                        source,
                    }),
                Self::Conjunction(left, right) => {
                    if !left.evaluate().await? {
                        return Ok(false);
                    }
                    right.evaluate().await
                }
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(calls: &Arc<AtomicUsize>, value: bool) -> Variables {
        let calls = Arc::clone(calls);
        Variables::new().with("v", move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(value) }
        })
    }

    #[tokio::test]
    async fn test_conjunction_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let empty = Variables::new();
        let tracked = counting(&calls, true);

        let condition = Condition::scoped("a", Predicate::never(), &empty)
            .and(Condition::scoped("b", Predicate::variable("v"), &tracked));

        assert!(!condition.evaluate().await.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_conjunction_of_true_leaves() {
        let calls = Arc::new(AtomicUsize::new(0));
        let empty = Variables::new();
        let tracked = counting(&calls, true);

        let condition = Condition::all([
            Condition::scoped("a", Predicate::always(), &empty),
            Condition::scoped("b", Predicate::variable("v"), &tracked),
            Condition::scoped("c", Predicate::always(), &empty),
        ])
        .unwrap();

        assert!(condition.evaluate().await.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_names_extension() {
        let empty = Variables::new();
        let condition = Condition::scoped("a", Predicate::always(), &empty)
            .and(Condition::scoped("b", Predicate::variable("missing"), &empty));

        let failure = condition.evaluate().await.unwrap_err();
        assert_eq!(failure.extension, "b");
        assert_eq!(failure.source.variable(), "missing");
    }

    #[test]
    fn test_all_of_nothing() {
        assert!(Condition::all(Vec::new()).is_none());
    }
}
