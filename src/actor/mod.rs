//! The machine engine: actors that run a [`Machine`](crate::machine::Machine).
//!
//! An actor is created from a definition, started, fed events, observed
//! through subscriptions and finally stopped. Stopped actors are never
//! reused; a fresh actor is created instead.

mod options;
mod runtime;
mod snapshot;

pub use options::ActorOptions;
pub use runtime::{Actor, ActorStatus};
pub use snapshot::{Snapshot, SnapshotStatus};
