//! Transition history of a single actor.
//!
//! Every transition an actor takes is recorded with the event that caused
//! it. A fresh actor (initial start or restart) starts with empty history.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of one taken transition.
///
/// Targetless transitions (context updates that keep the state) are
/// recorded with `from == to`.
///
/// # Example
///
/// ```rust
/// use machine_atom::core::{State, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Valve {
///     Shut,
///     Flowing,
/// }
///
/// impl State for Valve {
///     fn name(&self) -> &str {
///         match self {
///             Self::Shut => "Shut",
///             Self::Flowing => "Flowing",
///         }
///     }
/// }
///
/// let transition = StateTransition {
///     from: Valve::Shut,
///     to: Valve::Flowing,
///     event: "Open".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert!(!transition.is_self_transition());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state the actor was in
    pub from: S,
    /// The state the actor moved to
    pub to: S,
    /// Event type that triggered the transition
    pub event: String,
    /// When the transition was taken
    pub timestamp: DateTime<Utc>,
}

impl<S: State> StateTransition<S> {
    pub fn is_self_transition(&self) -> bool {
        self.from == self.to
    }
}

/// Ordered history of transitions.
///
/// `record` is pure and returns a new history; the actor itself appends
/// in place and may cap the number of retained entries.
///
/// # Example
///
/// ```rust
/// use machine_atom::core::{State, StateHistory, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Phase { Idle, Busy, Done }
///
/// impl State for Phase {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Busy => "Busy",
///             Self::Done => "Done",
///         }
///     }
/// }
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: Phase::Idle,
///         to: Phase::Busy,
///         event: "Begin".to_string(),
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: Phase::Busy,
///         to: Phase::Done,
///         event: "Finish".to_string(),
///         timestamp: Utc::now(),
///     });
///
/// assert_eq!(history.get_path(), vec![&Phase::Idle, &Phase::Busy, &Phase::Done]);
/// assert_eq!(history.events(), vec!["Begin", "Finish"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Return a new history with `transition` appended. `self` is untouched.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Append in place, dropping the oldest entries beyond `limit`.
    pub(crate) fn push_bounded(&mut self, transition: StateTransition<S>, limit: Option<usize>) {
        self.transitions.push(transition);
        if let Some(limit) = limit {
            let excess = self.transitions.len().saturating_sub(limit);
            if excess > 0 {
                self.transitions.drain(..excess);
            }
        }
    }

    /// States traversed: the `from` of the first entry, then every `to`.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Event types in the order they were applied.
    pub fn events(&self) -> Vec<&str> {
        self.transitions.iter().map(|t| t.event.as_str()).collect()
    }

    /// Time between the first and last recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Light {
        Red,
        Green,
        Yellow,
    }

    impl State for Light {
        fn name(&self) -> &str {
            match self {
                Self::Red => "Red",
                Self::Green => "Green",
                Self::Yellow => "Yellow",
            }
        }
    }

    fn step(from: Light, to: Light, event: &str) -> StateTransition<Light> {
        StateTransition {
            from,
            to,
            event: event.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<Light> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_leaves_original_untouched() {
        let history = StateHistory::new();
        let next = history.record(step(Light::Red, Light::Green, "Go"));

        assert_eq!(history.len(), 0);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn path_and_events_follow_cycle() {
        let history = StateHistory::new()
            .record(step(Light::Red, Light::Green, "Go"))
            .record(step(Light::Green, Light::Yellow, "Slow"))
            .record(step(Light::Yellow, Light::Red, "Stop"));

        assert_eq!(
            history.get_path(),
            vec![&Light::Red, &Light::Green, &Light::Yellow, &Light::Red]
        );
        assert_eq!(history.events(), vec!["Go", "Slow", "Stop"]);
    }

    #[test]
    fn push_bounded_keeps_newest_entries() {
        let mut history = StateHistory::new();
        history.push_bounded(step(Light::Red, Light::Green, "Go"), Some(2));
        history.push_bounded(step(Light::Green, Light::Yellow, "Slow"), Some(2));
        history.push_bounded(step(Light::Yellow, Light::Red, "Stop"), Some(2));

        assert_eq!(history.events(), vec!["Slow", "Stop"]);
    }

    #[test]
    fn push_without_limit_keeps_everything() {
        let mut history = StateHistory::new();
        for _ in 0..5 {
            history.push_bounded(step(Light::Red, Light::Red, "Hold"), None);
        }
        assert_eq!(history.len(), 5);
        assert!(history.transitions().iter().all(|t| t.is_self_transition()));
    }

    #[test]
    fn single_transition_has_zero_duration() {
        let history = StateHistory::new().record(step(Light::Red, Light::Green, "Go"));
        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn history_survives_json() {
        let history = StateHistory::new().record(step(Light::Red, Light::Green, "Go"));

        let json = serde_json::to_string(&history).unwrap();
        let back: StateHistory<Light> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.events(), vec!["Go"]);
        assert_eq!(back.get_path(), vec![&Light::Red, &Light::Green]);
    }
}
