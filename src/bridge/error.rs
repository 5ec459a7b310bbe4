//! Bridge error types.

use crate::builder::BuildError;
use thiserror::Error;

/// Errors surfaced by [`MachineBridge`](crate::bridge::MachineBridge).
///
/// Events a machine does not handle are not errors; they are ignored by
/// the actor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    /// The machine factory returned an invalid definition. Not retried.
    #[error("Machine factory produced an invalid machine: {0}")]
    Configuration(#[from] BuildError),
}
