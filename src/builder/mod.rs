//! Builder API for ergonomic machine construction.
//!
//! This module provides fluent builders and macros for creating machine
//! definitions with minimal boilerplate while maintaining type safety.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Context, Event, Guard, State};
use crate::machine::Transition;

/// Create an unguarded transition from `from` to `to` on `event_type`.
///
/// # Example
///
/// ```
/// use machine_atom::builder::simple_transition;
/// use machine_atom::{event_enum, state_enum};
///
/// state_enum! {
///     enum Switch {
///         Off,
///         On,
///     }
/// }
///
/// event_enum! {
///     enum Flip {
///         Toggle,
///     }
/// }
///
/// let transition = simple_transition::<Switch, (), Flip>(Switch::Off, "Toggle", Switch::On);
/// assert!(transition.handles(&Switch::Off, &Flip::Toggle));
/// ```
pub fn simple_transition<S, C, E>(from: S, event_type: &str, to: S) -> Transition<S, C, E>
where
    S: State,
    C: Context,
    E: Event,
{
    Transition {
        source: Some(from),
        event: event_type.to_string(),
        target: Some(to),
        guard: None,
        actions: Vec::new(),
    }
}

/// Create a transition that is only taken when `guard` passes.
///
/// # Example
///
/// ```
/// use machine_atom::builder::guarded_transition;
/// use machine_atom::{event_enum, state_enum};
///
/// state_enum! {
///     enum Gate {
///         Locked,
///         Open,
///     }
/// }
///
/// event_enum! {
///     enum GateEvent {
///         Coin,
///     }
/// }
///
/// let transition = guarded_transition::<Gate, u32, GateEvent, _>(
///     Gate::Locked,
///     "Coin",
///     Gate::Open,
///     |credit, _| *credit >= 2,
/// );
/// assert!(!transition.is_enabled(&1, &GateEvent::Coin));
/// ```
pub fn guarded_transition<S, C, E, F>(from: S, event_type: &str, to: S, guard: F) -> Transition<S, C, E>
where
    S: State,
    C: Context,
    E: Event,
    F: Fn(&C, &E) -> bool + Send + Sync + 'static,
{
    Transition {
        guard: Some(Guard::new(guard)),
        ..simple_transition(from, event_type, to)
    }
}
