//! The `State` trait implemented by every machine state value.
//!
//! A state is the discriminant half of a [`Snapshot`](crate::actor::Snapshot);
//! the other half is the machine context.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for machine state values.
///
/// States are plain immutable values. The actor compares them to select
/// transitions and copies them into every snapshot it emits.
///
/// # Example
///
/// ```rust
/// use machine_atom::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
///     Welded,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///             Self::Welded => "Welded",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Welded)
///     }
/// }
///
/// assert!(Door::Welded.is_final());
/// assert_eq!(Door::Open.name(), "Open");
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Name used for logging and history paths.
    fn name(&self) -> &str;

    /// Final states accept no further events. An actor entering one
    /// reports its snapshot as done.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Error states are informational only; the engine treats them like
    /// any other state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Lamp {
        Off,
        On,
        Burnt,
    }

    impl State for Lamp {
        fn name(&self) -> &str {
            match self {
                Self::Off => "Off",
                Self::On => "On",
                Self::Burnt => "Burnt",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Burnt)
        }

        fn is_error(&self) -> bool {
            matches!(self, Self::Burnt)
        }
    }

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    struct Plain;

    impl State for Plain {
        fn name(&self) -> &str {
            "Plain"
        }
    }

    #[test]
    fn names_match_variants() {
        assert_eq!(Lamp::Off.name(), "Off");
        assert_eq!(Lamp::On.name(), "On");
        assert_eq!(Lamp::Burnt.name(), "Burnt");
    }

    #[test]
    fn only_burnt_is_final_and_error() {
        assert!(!Lamp::Off.is_final());
        assert!(!Lamp::On.is_final());
        assert!(Lamp::Burnt.is_final());
        assert!(Lamp::Burnt.is_error());
        assert!(!Lamp::On.is_error());
    }

    #[test]
    fn defaults_are_not_final_and_not_error() {
        assert!(!Plain.is_final());
        assert!(!Plain.is_error());
    }

    #[test]
    fn states_survive_json() {
        let json = serde_json::to_string(&Lamp::On).unwrap();
        let back: Lamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Lamp::On);
    }
}
