//! Validated machine definitions.

use crate::actor::{Snapshot, SnapshotStatus};
use crate::core::{Context, Event, State};
use crate::machine::transition::Transition;
use std::fmt;
use std::sync::Arc;

/// An immutable, validated machine definition.
///
/// Built with [`MachineBuilder`](crate::builder::MachineBuilder). A
/// definition holds no runtime state; every [`Actor`](crate::actor::Actor)
/// created from it starts at the same initial state and context.
pub struct Machine<S, C, E> {
    id: String,
    initial: S,
    context: C,
    transitions: Arc<[Transition<S, C, E>]>,
}

impl<S: State, C: Context, E: Event> Machine<S, C, E> {
    pub(crate) fn new(
        id: String,
        initial: S,
        context: C,
        transitions: Vec<Transition<S, C, E>>,
    ) -> Self {
        Self {
            id,
            initial,
            context,
            transitions: transitions.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    pub fn initial_context(&self) -> &C {
        &self.context
    }

    pub fn transitions(&self) -> &[Transition<S, C, E>] {
        &self.transitions
    }

    /// Snapshot an actor reports right after `start`.
    pub fn initial_snapshot(&self) -> Snapshot<S, C> {
        Snapshot::new(self.initial.clone(), self.context.clone())
    }

    /// Pure transition function.
    ///
    /// Returns `None` when the event is ignored: the snapshot is done, or
    /// no enabled transition handles the event in the current state.
    /// Transitions declared on the current state win over wildcard ones.
    pub fn resolve(&self, snapshot: &Snapshot<S, C>, event: &E) -> Option<Snapshot<S, C>> {
        if snapshot.status == SnapshotStatus::Done {
            return None;
        }

        let current = &snapshot.value;
        let context = &snapshot.context;
        let candidates = self.transitions.iter().filter(|t| t.handles(current, event));
        let (own, wildcard): (Vec<_>, Vec<_>) = candidates.partition(|t| !t.is_wildcard());

        let transition = own
            .into_iter()
            .chain(wildcard)
            .find(|t| t.is_enabled(context, event))?;

        let (value, context) = transition.apply(current, context, event);
        Some(Snapshot::new(value, context))
    }
}

impl<S: Clone, C: Clone, E> Clone for Machine<S, C, E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            initial: self.initial.clone(),
            context: self.context.clone(),
            transitions: Arc::clone(&self.transitions),
        }
    }
}

impl<S: fmt::Debug, C: fmt::Debug, E> fmt::Debug for Machine<S, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("initial", &self.initial)
            .field("context", &self.context)
            .field("transitions", &self.transitions)
            .finish()
    }
}
