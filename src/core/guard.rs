//! Guard predicates for controlling transitions.
//!
//! A guard sees the current context and the incoming event and decides
//! whether a transition is enabled. Guards must be pure.

use super::event::{Context, Event};
use std::fmt;
use std::sync::Arc;

/// Pure predicate evaluated against `(context, event)` before a transition
/// is taken.
///
/// Cloning a guard is cheap; clones share the same predicate.
///
/// # Example
///
/// ```rust
/// use machine_atom::core::{Event, Guard};
///
/// #[derive(Clone, Debug)]
/// struct Deposit(u32);
///
/// impl Event for Deposit {
///     fn event_type(&self) -> &str {
///         "Deposit"
///     }
/// }
///
/// let under_limit = Guard::new(|balance: &u32, e: &Deposit| balance + e.0 <= 100);
///
/// assert!(under_limit.check(&40, &Deposit(60)));
/// assert!(!under_limit.check(&40, &Deposit(61)));
/// ```
pub struct Guard<C, E> {
    predicate: Arc<dyn Fn(&C, &E) -> bool + Send + Sync>,
}

impl<C: Context, E: Event> Guard<C, E> {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C, &E) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Guard that only looks at the context.
    pub fn on_context<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Self::new(move |context, _| predicate(context))
    }

    pub fn check(&self, context: &C, event: &E) -> bool {
        (self.predicate)(context, event)
    }

    /// Enabled when `self` is disabled.
    pub fn negate(self) -> Self {
        let inner = self.predicate;
        Guard {
            predicate: Arc::new(move |context, event| !inner(context, event)),
        }
    }
}

impl<C, E> Clone for Guard<C, E> {
    fn clone(&self) -> Self {
        Guard {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C, E> fmt::Debug for Guard<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum Vote {
        Yes,
        No,
    }

    impl Event for Vote {
        fn event_type(&self) -> &str {
            match self {
                Self::Yes => "Yes",
                Self::No => "No",
            }
        }
    }

    #[test]
    fn guard_sees_event_payload() {
        let only_yes = Guard::new(|_: &(), e: &Vote| matches!(e, Vote::Yes));

        assert!(only_yes.check(&(), &Vote::Yes));
        assert!(!only_yes.check(&(), &Vote::No));
    }

    #[test]
    fn context_guard_ignores_event() {
        let quorum = Guard::on_context(|votes: &u32| *votes >= 3);

        assert!(!quorum.check(&2, &Vote::Yes));
        assert!(quorum.check(&3, &Vote::No));
    }

    #[test]
    fn negate_flips_result() {
        let quorum = Guard::on_context(|votes: &u32| *votes >= 3).negate();

        assert!(quorum.check(&0, &Vote::Yes));
        assert!(!quorum.check(&5, &Vote::Yes));
    }

    #[test]
    fn clones_share_predicate() {
        let guard = Guard::on_context(|n: &i32| n.is_positive());
        let cloned = guard.clone();

        assert_eq!(guard.check(&1, &Vote::No), cloned.check(&1, &Vote::No));
        assert_eq!(guard.check(&-1, &Vote::No), cloned.check(&-1, &Vote::No));
    }
}
