//! Running machine instances.

use crate::actor::options::ActorOptions;
use crate::actor::snapshot::Snapshot;
use crate::core::{Context, Event, State, StateHistory, StateTransition};
use crate::machine::Machine;
use crate::subscription::Subscription;
use chrono::Utc;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Lifecycle of an actor. Actors only move forward through these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorStatus {
    NotStarted,
    Running,
    Stopped,
}

type Callback<S, C> = Arc<dyn Fn(&Snapshot<S, C>) + Send + Sync>;

struct Listener<S, C> {
    id: u64,
    active: AtomicBool,
    callback: Callback<S, C>,
}

struct ActorState<S: State, C> {
    status: ActorStatus,
    snapshot: Snapshot<S, C>,
    history: StateHistory<S>,
    listeners: Vec<Arc<Listener<S, C>>>,
    next_listener: u64,
}

struct ActorInner<S: State, C, E> {
    id: String,
    session_id: Uuid,
    machine: Machine<S, C, E>,
    history_limit: Option<usize>,
    state: Mutex<ActorState<S, C>>,
}

/// A live instance of a [`Machine`].
///
/// Owns the current snapshot, transition history and subscriber list.
/// `send` computes the next snapshot and notifies subscribers on the
/// calling thread before it returns. Handles are cheap to clone and refer
/// to the same instance.
///
/// # Example
///
/// ```rust
/// use machine_atom::actor::{Actor, ActorOptions};
/// use machine_atom::builder::{simple_transition, MachineBuilder};
/// use machine_atom::{event_enum, state_enum};
///
/// state_enum! {
///     enum Bulb {
///         Off,
///         On,
///     }
/// }
///
/// event_enum! {
///     enum Switch {
///         Toggle,
///     }
/// }
///
/// let machine = MachineBuilder::new("bulb")
///     .initial(Bulb::Off)
///     .context(())
///     .add_transition(simple_transition(Bulb::Off, "Toggle", Bulb::On))
///     .add_transition(simple_transition(Bulb::On, "Toggle", Bulb::Off))
///     .build()
///     .unwrap();
///
/// let actor = Actor::new(machine, ActorOptions::default());
/// actor.start();
/// actor.send(Switch::Toggle);
/// assert_eq!(actor.snapshot().value, Bulb::On);
/// actor.stop();
/// ```
pub struct Actor<S: State, C, E> {
    inner: Arc<ActorInner<S, C, E>>,
}

impl<S: State, C, E> Actor<S, C, E> {
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Unique per instance, even for actors of the same machine.
    pub fn session_id(&self) -> Uuid {
        self.inner.session_id
    }
}

impl<S: State, C: Context, E: Event> Actor<S, C, E> {
    /// Create an actor that has not started yet. Its snapshot is the
    /// machine's initial snapshot.
    pub fn new(machine: Machine<S, C, E>, options: ActorOptions) -> Self {
        let snapshot = machine.initial_snapshot();
        let id = options.id.unwrap_or_else(|| machine.id().to_string());
        Self {
            inner: Arc::new(ActorInner {
                id,
                session_id: Uuid::new_v4(),
                machine,
                history_limit: options.history_limit,
                state: Mutex::new(ActorState {
                    status: ActorStatus::NotStarted,
                    snapshot,
                    history: StateHistory::new(),
                    listeners: Vec::new(),
                    next_listener: 0,
                }),
            }),
        }
    }

    pub fn machine(&self) -> &Machine<S, C, E> {
        &self.inner.machine
    }

    pub fn status(&self) -> ActorStatus {
        self.inner.state.lock().status
    }

    pub fn snapshot(&self) -> Snapshot<S, C> {
        self.inner.state.lock().snapshot.clone()
    }

    pub fn history(&self) -> StateHistory<S> {
        self.inner.state.lock().history.clone()
    }

    /// Begin accepting events. Starting twice is a no-op; a stopped actor
    /// stays stopped.
    pub fn start(&self) {
        let mut state = self.inner.state.lock();
        match state.status {
            ActorStatus::NotStarted => {
                state.status = ActorStatus::Running;
                debug!(
                    actor = %self.inner.id,
                    session = %self.inner.session_id,
                    state = state.snapshot.value.name(),
                    "actor started"
                );
            }
            ActorStatus::Running => {}
            ActorStatus::Stopped => {
                warn!(actor = %self.inner.id, session = %self.inner.session_id, "stopped actors cannot be started again");
            }
        }
    }

    /// Stop the actor and drop every subscriber. Idempotent.
    pub fn stop(&self) {
        let listeners = {
            let mut state = self.inner.state.lock();
            if state.status == ActorStatus::Stopped {
                return;
            }
            state.status = ActorStatus::Stopped;
            std::mem::take(&mut state.listeners)
        };
        for listener in &listeners {
            listener.active.store(false, Ordering::SeqCst);
        }
        debug!(actor = %self.inner.id, session = %self.inner.session_id, "actor stopped");
    }

    /// Deliver an event.
    ///
    /// Events without an enabled transition, and events sent to an actor
    /// that is not running, leave the snapshot untouched and notify nobody.
    pub fn send(&self, event: E) {
        let (next, listeners) = {
            let mut state = self.inner.state.lock();
            if state.status != ActorStatus::Running {
                drop(state);
                warn!(
                    actor = %self.inner.id,
                    session = %self.inner.session_id,
                    event = event.event_type(),
                    "event sent to an actor that is not running; ignoring"
                );
                return;
            }

            let Some(next) = self.inner.machine.resolve(&state.snapshot, &event) else {
                trace!(
                    actor = %self.inner.id,
                    state = state.snapshot.value.name(),
                    event = event.event_type(),
                    "no enabled transition"
                );
                return;
            };

            let record = StateTransition {
                from: state.snapshot.value.clone(),
                to: next.value.clone(),
                event: event.event_type().to_string(),
                timestamp: Utc::now(),
            };
            trace!(
                actor = %self.inner.id,
                from = record.from.name(),
                to = record.to.name(),
                event = %record.event,
                "transition"
            );
            let limit = self.inner.history_limit;
            state.history.push_bounded(record, limit);
            state.snapshot = next.clone();
            (next, state.listeners.clone())
        };

        for listener in listeners {
            // Re-checked per call: an earlier listener may have unsubscribed it.
            if listener.active.load(Ordering::SeqCst) {
                (listener.callback)(&next);
            }
        }
    }

    /// Register a listener for snapshots produced after this call.
    ///
    /// Subscribing to a stopped actor returns an inactive subscription.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Snapshot<S, C>) + Send + Sync + 'static,
    {
        let listener = {
            let mut state = self.inner.state.lock();
            if state.status == ActorStatus::Stopped {
                return Subscription::empty();
            }
            let listener = Arc::new(Listener {
                id: state.next_listener,
                active: AtomicBool::new(true),
                callback: Arc::new(callback),
            });
            state.next_listener += 1;
            state.listeners.push(Arc::clone(&listener));
            listener
        };

        let actor: Weak<ActorInner<S, C, E>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            listener.active.store(false, Ordering::SeqCst);
            if let Some(actor) = actor.upgrade() {
                actor.state.lock().listeners.retain(|l| l.id != listener.id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.state.lock().listeners.len()
    }
}

impl<S: State, C, E> Clone for Actor<S, C, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State, C: fmt::Debug, E> fmt::Debug for Actor<S, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Actor")
            .field("id", &self.inner.id)
            .field("session_id", &self.inner.session_id)
            .field("status", &state.status)
            .field("snapshot", &state.snapshot)
            .finish()
    }
}
