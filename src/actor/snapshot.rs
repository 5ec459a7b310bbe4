//! Immutable snapshots emitted by actors.

use crate::core::State;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Whether the machine can still react to events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    Active,
    /// The machine reached a final state.
    Done,
}

/// The state value plus context of an actor at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<S, C> {
    pub value: S,
    pub context: C,
    pub status: SnapshotStatus,
}

impl<S: State, C> Snapshot<S, C> {
    /// Build a snapshot, deriving `status` from `value.is_final()`.
    pub fn new(value: S, context: C) -> Self {
        let status = if value.is_final() {
            SnapshotStatus::Done
        } else {
            SnapshotStatus::Active
        };
        Self {
            value,
            context,
            status,
        }
    }

    pub fn matches(&self, value: &S) -> bool {
        self.value == *value
    }

    pub fn is_done(&self) -> bool {
        self.status == SnapshotStatus::Done
    }
}

impl<S, C> Snapshot<S, C>
where
    S: State,
    C: Serialize + DeserializeOwned,
{
    /// Persist the snapshot as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
