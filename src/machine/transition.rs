//! Transition table entries.

use crate::core::{Context, Event, Guard, State};
use std::fmt;
use std::sync::Arc;

/// Context update run when a transition is taken. Returns the next context.
pub type Action<C, E> = Arc<dyn Fn(&C, &E) -> C + Send + Sync>;

/// One entry of a machine's transition table.
///
/// - `source: None` makes the transition available from every state
///   (checked after the current state's own transitions).
/// - `target: None` keeps the current state and only runs `actions`.
pub struct Transition<S, C, E> {
    pub source: Option<S>,
    pub event: String,
    pub target: Option<S>,
    pub guard: Option<Guard<C, E>>,
    pub actions: Vec<Action<C, E>>,
}

impl<S: State, C: Context, E: Event> Transition<S, C, E> {
    /// Whether this entry listens for `event` while in `current` (pure).
    pub fn handles(&self, current: &S, event: &E) -> bool {
        if self.event != event.event_type() {
            return false;
        }
        self.source.as_ref().map_or(true, |source| source == current)
    }

    /// Guard check; transitions without a guard are always enabled.
    pub fn is_enabled(&self, context: &C, event: &E) -> bool {
        self.guard.as_ref().map_or(true, |g| g.check(context, event))
    }

    pub fn is_wildcard(&self) -> bool {
        self.source.is_none()
    }

    /// Fold the actions over `context` and resolve the next state value.
    pub(crate) fn apply(&self, current: &S, context: &C, event: &E) -> (S, C) {
        let next_context = self
            .actions
            .iter()
            .fold(context.clone(), |ctx, action| action(&ctx, event));
        let next_state = self.target.clone().unwrap_or_else(|| current.clone());
        (next_state, next_context)
    }
}

impl<S: Clone, C, E> Clone for Transition<S, C, E> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            event: self.event.clone(),
            target: self.target.clone(),
            guard: self.guard.clone(),
            actions: self.actions.clone(),
        }
    }
}

impl<S: fmt::Debug, C, E> fmt::Debug for Transition<S, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("event", &self.event)
            .field("target", &self.target)
            .field("guarded", &self.guard.is_some())
            .field("actions", &self.actions.len())
            .finish()
    }
}
