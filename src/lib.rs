//! machine-atom: a running state machine exposed as a reactive atom
//!
//! A [`MachineBridge`] pairs two lifecycles that would otherwise drift
//! apart: an [`Actor`] that owns a machine's state, context and
//! subscribers, and an [`Atom`] that downstream code reads and subscribes
//! to. The bridge starts the actor when the atom is first used, mirrors
//! every snapshot into the atom, stops the actor when the atom is no longer
//! observed, and replaces it with a fresh one on [`RESTART`].
//!
//! # Modules
//!
//! - [`core`]: `State`, `Event`, `Guard` and transition history
//! - [`machine`] / [`builder`]: validated machine definitions
//! - [`actor`]: the engine that runs a definition
//! - [`atom`]: the reactive container
//! - [`bridge`]: the glue, plus the restart signal
//!
//! # Example
//!
//! ```rust
//! use machine_atom::builder::{MachineBuilder, TransitionBuilder};
//! use machine_atom::{event_enum, state_enum, MachineBridge, RESTART};
//!
//! state_enum! {
//!     enum Button {
//!         Inactive,
//!         Active,
//!         Final,
//!     }
//!     final: [Final]
//! }
//!
//! event_enum! {
//!     enum ButtonEvent {
//!         Press,
//!         Disable,
//!     }
//! }
//!
//! let bridge = MachineBridge::new(|| {
//!     MachineBuilder::new("button")
//!         .initial(Button::Inactive)
//!         .context(0u32)
//!         .transition(TransitionBuilder::new().from(Button::Inactive).on("Press").to(Button::Active))?
//!         .transition(
//!             TransitionBuilder::new()
//!                 .from(Button::Active)
//!                 .on("Press")
//!                 .assign(|count: &u32, _: &ButtonEvent| count + 1),
//!         )?
//!         .transition(TransitionBuilder::new().any_state().on("Disable").to(Button::Final))?
//!         .build()
//! });
//!
//! let _sub = bridge.subscribe(|snapshot| println!("{:?}", snapshot.value)).unwrap();
//! bridge.dispatch(ButtonEvent::Press).unwrap();
//! bridge.dispatch(ButtonEvent::Press).unwrap();
//! bridge.dispatch(ButtonEvent::Disable).unwrap();
//! assert!(bridge.read().unwrap().is_done());
//!
//! bridge.dispatch(RESTART).unwrap();
//! let snapshot = bridge.read().unwrap();
//! assert_eq!(snapshot.value, Button::Inactive);
//! assert_eq!(snapshot.context, 0);
//! ```

pub mod actor;
pub mod atom;
pub mod bridge;
pub mod builder;
pub mod core;
pub mod machine;
pub mod subscription;

// Re-export commonly used types
pub use actor::{Actor, ActorOptions, Snapshot, SnapshotStatus};
pub use atom::Atom;
pub use bridge::{BridgeError, Dispatch, MachineBridge, RESTART};
pub use core::{Event, Guard, State};
pub use subscription::Subscription;
