//! Macros for ergonomic machine construction.

/// Generate a unit-variant enum implementing [`State`](crate::core::State).
///
/// # Example
///
/// ```
/// use machine_atom::state_enum;
/// use machine_atom::core::State;
///
/// state_enum! {
///     pub enum Upload {
///         Idle,
///         Sending,
///         Sent,
///         Rejected,
///     }
///     final: [Sent, Rejected]
///     error: [Rejected]
/// }
///
/// assert!(Upload::Rejected.is_error());
/// assert_eq!(Upload::Sending.name(), "Sending");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

/// Generate a unit-variant enum implementing [`Event`](crate::core::Event).
///
/// The event type of each variant is its name.
///
/// # Example
///
/// ```
/// use machine_atom::event_enum;
/// use machine_atom::core::Event;
///
/// event_enum! {
///     pub enum Remote {
///         Press,
///         Disable,
///     }
/// }
///
/// assert_eq!(Remote::Disable.event_type(), "Disable");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            fn event_type(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
