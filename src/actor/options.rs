//! Per-actor configuration.

use serde::{Deserialize, Serialize};

/// Options applied when an actor is created.
///
/// A bridge hands the same options to every actor it instantiates,
/// including the ones created by a restart. Missing fields deserialize to
/// their defaults.
///
/// # Example
///
/// ```rust
/// use machine_atom::actor::ActorOptions;
///
/// let options = ActorOptions::new().with_id("checkout").with_history_limit(32);
/// assert_eq!(options.id.as_deref(), Some("checkout"));
///
/// let parsed: ActorOptions = serde_json::from_str(r#"{"history_limit": 8}"#).unwrap();
/// assert_eq!(parsed.history_limit, Some(8));
/// assert!(parsed.id.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorOptions {
    /// Overrides the machine id in logs.
    pub id: Option<String>,

    /// Maximum number of transitions kept in history. Unbounded when `None`.
    pub history_limit: Option<usize>,
}

impl ActorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }
}
