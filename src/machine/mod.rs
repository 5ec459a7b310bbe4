//! Machine definitions: an initial state, an initial context and a
//! transition table.
//!
//! Definitions are inert. Running one requires an
//! [`Actor`](crate::actor::Actor).

mod definition;
mod transition;

pub use definition::Machine;
pub use transition::{Action, Transition};
