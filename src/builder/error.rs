//! Build errors for machine and transition builders.

use thiserror::Error;

/// Errors that can occur when building machines and transitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Initial context not specified. Call .context(value) before .build()")]
    MissingContext,

    #[error("Transition event not specified. Call .on(event_type)")]
    MissingEventType,

    #[error("Transition source not specified. Call .from(state) or .any_state()")]
    MissingSource,

    #[error("Final state '{state}' cannot have outgoing transitions")]
    FinalStateHasTransitions { state: String },
}
