//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Context, Event, Guard, State};
use crate::machine::{Action, Transition};
use std::sync::Arc;

/// Builder for constructing transitions with a fluent API.
///
/// A transition needs a source (`from` or `any_state`) and an event type.
/// Target, guard and actions are optional.
pub struct TransitionBuilder<S, C, E> {
    source: Option<Option<S>>,
    event: Option<String>,
    target: Option<S>,
    guard: Option<Guard<C, E>>,
    actions: Vec<Action<C, E>>,
}

impl<S: State, C: Context, E: Event> TransitionBuilder<S, C, E> {
    pub fn new() -> Self {
        Self {
            source: None,
            event: None,
            target: None,
            guard: None,
            actions: Vec::new(),
        }
    }

    /// Set the source state.
    pub fn from(mut self, state: S) -> Self {
        self.source = Some(Some(state));
        self
    }

    /// Make the transition available from every state.
    pub fn any_state(mut self) -> Self {
        self.source = Some(None);
        self
    }

    /// Set the event type this transition listens for (required).
    pub fn on(mut self, event_type: impl Into<String>) -> Self {
        self.event = Some(event_type.into());
        self
    }

    /// Set the target state. Without one the state is kept.
    pub fn to(mut self, state: S) -> Self {
        self.target = Some(state);
        self
    }

    pub fn guard(mut self, guard: Guard<C, E>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C, &E) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Append a context update. Actions run in the order they were added.
    pub fn assign<F>(mut self, action: F) -> Self
    where
        F: Fn(&C, &E) -> C + Send + Sync + 'static,
    {
        self.actions.push(Arc::new(action));
        self
    }

    pub fn build(self) -> Result<Transition<S, C, E>, BuildError> {
        let source = self.source.ok_or(BuildError::MissingSource)?;
        let event = self
            .event
            .filter(|e| !e.is_empty())
            .ok_or(BuildError::MissingEventType)?;

        Ok(Transition {
            source,
            event,
            target: self.target,
            guard: self.guard,
            actions: self.actions,
        })
    }
}

impl<S: State, C: Context, E: Event> Default for TransitionBuilder<S, C, E> {
    fn default() -> Self {
        Self::new()
    }
}
