//! Core value types shared by machines, actors and the bridge.
//!
//! - `State` and `Event` traits for the values a machine is written in
//! - `Guard` predicates over context and event
//! - Transition history

mod event;
mod guard;
mod history;
mod state;

pub use event::{Context, Event};
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::State;
