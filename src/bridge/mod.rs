//! The machine bridge: a running actor exposed as an [`Atom`] of snapshots.
//!
//! A [`MachineBridge`] keeps one actor alive while its atom is mounted:
//!
//! - the first read, subscribe or dispatch calls the factory, starts an
//!   actor and seeds the atom with its initial snapshot
//! - every snapshot the actor emits is written into the atom on the same
//!   call stack as the transition
//! - when the last subscriber leaves, the actor is unsubscribed and stopped;
//!   the next use starts a brand-new one
//! - dispatching [`RESTART`] replaces the live actor with a fresh one and
//!   publishes its initial snapshot
//!
//! At most one actor is live per bridge. Dispatch calls are serialized by a
//! re-entrant lock, so listeners may dispatch from inside a notification on
//! the same thread while other threads wait their turn.

mod error;
mod lifecycle;
mod signal;

pub use error::BridgeError;
pub use lifecycle::MachineFactory;
pub use signal::{Dispatch, Restart, RESTART};

use crate::actor::{Actor, ActorOptions, Snapshot};
use crate::atom::{Atom, Mounted, Setter};
use crate::builder::BuildError;
use crate::core::{Context, Event, State, StateHistory};
use crate::machine::Machine;
use crate::subscription::Subscription;
use lifecycle::Lifecycle;
use parking_lot::{Mutex, ReentrantMutex};
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};
use uuid::Uuid;

struct LiveActor<S: State, C, E> {
    actor: Actor<S, C, E>,
    subscription: Subscription,
}

/// What the bridge holds while its atom is mounted.
struct Slot<S: State, C, E> {
    /// Writes into the current mount of the atom.
    publish: Option<Setter<Snapshot<S, C>>>,
    live: Option<LiveActor<S, C, E>>,
}

impl<S: State, C, E> Slot<S, C, E> {
    fn empty() -> Self {
        Self {
            publish: None,
            live: None,
        }
    }
}

struct BridgeInner<S: State, C, E> {
    atom: Atom<Snapshot<S, C>, BridgeError>,
    slot: Arc<Mutex<Slot<S, C, E>>>,
    lifecycle: Arc<Lifecycle<S, C, E>>,
    turn: ReentrantMutex<()>,
}

/// A state machine actor exposed as a reactive snapshot atom.
///
/// Reads return the latest snapshot, `dispatch` drives the machine. Clones
/// share the same actor and atom.
///
/// # Example
///
/// ```rust
/// use machine_atom::bridge::{MachineBridge, RESTART};
/// use machine_atom::builder::{simple_transition, MachineBuilder};
/// use machine_atom::{event_enum, state_enum};
///
/// state_enum! {
///     enum Toggle {
///         Inactive,
///         Active,
///     }
/// }
///
/// event_enum! {
///     enum ToggleEvent {
///         Toggle,
///     }
/// }
///
/// let bridge = MachineBridge::new(|| {
///     MachineBuilder::<Toggle, (), ToggleEvent>::new("toggle")
///         .initial(Toggle::Inactive)
///         .context(())
///         .add_transition(simple_transition(Toggle::Inactive, "Toggle", Toggle::Active))
///         .add_transition(simple_transition(Toggle::Active, "Toggle", Toggle::Inactive))
///         .build()
/// });
///
/// bridge.dispatch(ToggleEvent::Toggle).unwrap();
/// assert_eq!(bridge.read().unwrap().value, Toggle::Active);
///
/// bridge.dispatch(RESTART).unwrap();
/// assert_eq!(bridge.read().unwrap().value, Toggle::Inactive);
/// ```
pub struct MachineBridge<S: State, C, E> {
    inner: Arc<BridgeInner<S, C, E>>,
}

impl<S: State, C: Context, E: Event> MachineBridge<S, C, E> {
    /// Create a bridge. Nothing is instantiated until first use.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Machine<S, C, E>, BuildError> + Send + Sync + 'static,
    {
        Self::with_options(factory, ActorOptions::default())
    }

    /// Create a bridge whose actors all receive `options`.
    pub fn with_options<F>(factory: F, options: ActorOptions) -> Self
    where
        F: Fn() -> Result<Machine<S, C, E>, BuildError> + Send + Sync + 'static,
    {
        let lifecycle = Arc::new(Lifecycle::new(Box::new(factory), options));
        let slot = Arc::new(Mutex::new(Slot::empty()));
        let atom = Atom::new(mount_actor(Arc::clone(&lifecycle), Arc::clone(&slot)));

        Self {
            inner: Arc::new(BridgeInner {
                atom,
                slot,
                lifecycle,
                turn: ReentrantMutex::new(()),
            }),
        }
    }

    /// Latest snapshot. Bootstraps the actor if nothing has yet.
    pub fn read(&self) -> Result<Snapshot<S, C>, BridgeError> {
        self.inner.atom.get()
    }

    /// Observe every snapshot written after this call.
    ///
    /// The first subscriber (or read) starts the actor; dropping the last
    /// subscription stops it.
    pub fn subscribe<F>(&self, listener: F) -> Result<Subscription, BridgeError>
    where
        F: Fn(&Snapshot<S, C>) + Send + Sync + 'static,
    {
        self.inner.atom.subscribe(listener)
    }

    /// Forward an event to the live actor, or restart on [`RESTART`].
    ///
    /// The resulting snapshot has reached every subscriber by the time this
    /// returns. The atom stays mounted for the whole call, even if the last
    /// subscriber leaves while it runs.
    pub fn dispatch(&self, message: impl Into<Dispatch<E>>) -> Result<(), BridgeError> {
        let message = message.into();
        let _turn = self.inner.turn.lock();
        trace!(restart = message.is_restart(), "dispatch turn");

        self.inner.atom.pinned(|| match message {
            Dispatch::Event(event) => {
                // A failed restart leaves the mount without an actor.
                if !self.is_live() {
                    self.restart_live()?;
                }
                self.forward(event);
                Ok(())
            }
            Dispatch::Restart => self.restart_live(),
        })?
    }

    /// Shorthand for dispatching a domain event.
    pub fn send(&self, event: E) -> Result<(), BridgeError> {
        self.dispatch(Dispatch::Event(event))
    }

    /// Shorthand for dispatching [`RESTART`].
    pub fn restart(&self) -> Result<(), BridgeError> {
        self.dispatch(RESTART)
    }

    /// Session of the live actor, if one is running.
    pub fn session_id(&self) -> Option<Uuid> {
        self.live_actor().map(|actor| actor.session_id())
    }

    /// Transition history of the live actor. Starts empty after a restart.
    pub fn history(&self) -> Option<StateHistory<S>> {
        self.live_actor().map(|actor| actor.history())
    }

    /// Whether an actor is currently running behind the atom.
    pub fn is_live(&self) -> bool {
        self.inner.slot.lock().live.is_some()
    }

    fn live_actor(&self) -> Option<Actor<S, C, E>> {
        self.inner.slot.lock().live.as_ref().map(|l| l.actor.clone())
    }

    fn forward(&self, event: E) {
        match self.live_actor() {
            Some(actor) => {
                trace!(actor = actor.id(), event = event.event_type(), "forwarding event");
                actor.send(event);
            }
            None => warn!(event = event.event_type(), "no live actor; event dropped"),
        }
    }

    /// Retire the live actor, then start and publish a fresh one.
    fn restart_live(&self) -> Result<(), BridgeError> {
        let lifecycle = &self.inner.lifecycle;
        let (publish, initial) = {
            let mut slot = self.inner.slot.lock();
            let Some(publish) = slot.publish.clone().filter(|p| p.is_current()) else {
                debug!("restart requested while unmounted; next use starts fresh");
                return Ok(());
            };

            if let Some(old) = slot.live.take() {
                lifecycle.retire(&old.actor, &old.subscription);
            }

            let (actor, initial) = lifecycle.instantiate_and_start()?;
            let forwarder = forward_into(publish.clone(), Arc::downgrade(&self.inner.slot), actor.session_id());
            let subscription = lifecycle.attach(&actor, forwarder);
            debug!(actor = actor.id(), session = %actor.session_id(), "restarted actor");
            slot.live = Some(LiveActor {
                actor,
                subscription,
            });
            (publish, initial)
        };

        publish.set(initial);
        Ok(())
    }
}

/// Atom setup: start an actor, route its snapshots into the atom and hand
/// back a cleanup that retires whichever actor is live at unmount time.
fn mount_actor<S, C, E>(
    lifecycle: Arc<Lifecycle<S, C, E>>,
    slot: Arc<Mutex<Slot<S, C, E>>>,
) -> impl Fn(Setter<Snapshot<S, C>>) -> Result<Mounted<Snapshot<S, C>>, BridgeError> + Send + Sync + 'static
where
    S: State,
    C: Context,
    E: Event,
{
    move |publish| {
        let (actor, initial) = lifecycle.instantiate_and_start()?;
        let forwarder = forward_into(publish.clone(), Arc::downgrade(&slot), actor.session_id());
        let subscription = lifecycle.attach(&actor, forwarder);

        let stale = {
            let mut slot = slot.lock();
            slot.publish = Some(publish);
            slot.live.replace(LiveActor {
                actor,
                subscription,
            })
        };
        if let Some(stale) = stale {
            lifecycle.retire(&stale.actor, &stale.subscription);
        }

        let lifecycle = Arc::clone(&lifecycle);
        let slot = Arc::clone(&slot);
        Ok(Mounted::with_cleanup(initial, move || {
            let retired = std::mem::replace(&mut *slot.lock(), Slot::empty());
            if let Some(live) = retired.live {
                lifecycle.retire(&live.actor, &live.subscription);
            }
        }))
    }
}

/// Listener attached to the actor with `session`. Writes only while that
/// actor is the one installed in the slot.
fn forward_into<S, C, E>(
    publish: Setter<Snapshot<S, C>>,
    slot: Weak<Mutex<Slot<S, C, E>>>,
    session: Uuid,
) -> impl Fn(&Snapshot<S, C>) + Send + Sync + 'static
where
    S: State,
    C: Context,
    E: Event,
{
    move |snapshot| {
        let installed = slot.upgrade().is_some_and(|slot| {
            slot.lock()
                .live
                .as_ref()
                .is_some_and(|live| live.actor.session_id() == session)
        });
        if !installed {
            trace!(%session, state = snapshot.value.name(), "snapshot from a retired actor dropped");
            return;
        }
        trace!(state = snapshot.value.name(), "propagating snapshot");
        publish.set(snapshot.clone());
    }
}

impl<S: State, C, E> Clone for MachineBridge<S, C, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State, C, E> fmt::Debug for MachineBridge<S, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.inner.slot.lock();
        f.debug_struct("MachineBridge")
            .field("mounted", &slot.publish.is_some())
            .field("session", &slot.live.as_ref().map(|l| l.actor.session_id()))
            .finish()
    }
}
