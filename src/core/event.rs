//! Events that drive a machine, and the context a machine carries.

use std::fmt::Debug;

/// A domain event delivered to an actor.
///
/// Transitions are keyed by [`Event::event_type`]; the event value itself
/// is also handed to guards and actions so variants can carry payloads.
///
/// # Example
///
/// ```rust
/// use machine_atom::core::Event;
///
/// #[derive(Clone, Debug)]
/// enum Player {
///     Play,
///     Seek { seconds: u32 },
/// }
///
/// impl Event for Player {
///     fn event_type(&self) -> &str {
///         match self {
///             Self::Play => "Play",
///             Self::Seek { .. } => "Seek",
///         }
///     }
/// }
///
/// assert_eq!(Player::Seek { seconds: 3 }.event_type(), "Seek");
/// ```
pub trait Event: Clone + Debug + Send + Sync + 'static {
    fn event_type(&self) -> &str;
}

/// Extended state carried alongside the state value.
///
/// Implemented for every type that is cloneable, debuggable and thread-safe,
/// including `()` for machines without context.
pub trait Context: Clone + Debug + Send + Sync + 'static {}

impl<T> Context for T where T: Clone + Debug + Send + Sync + 'static {}
