//! Create, observe and retire the actor behind a bridge.

use crate::actor::{Actor, ActorOptions, Snapshot};
use crate::bridge::error::BridgeError;
use crate::builder::BuildError;
use crate::core::{Context, Event, State};
use crate::machine::Machine;
use crate::subscription::Subscription;
use tracing::debug;

/// Zero-argument producer of machine definitions. Called once per actor.
pub type MachineFactory<S, C, E> = dyn Fn() -> Result<Machine<S, C, E>, BuildError> + Send + Sync;

/// Actor Lifecycle Wrapper: factory plus options, and the three steps of
/// an actor's life as seen from a bridge.
pub(crate) struct Lifecycle<S, C, E> {
    factory: Box<MachineFactory<S, C, E>>,
    options: ActorOptions,
}

impl<S: State, C: Context, E: Event> Lifecycle<S, C, E> {
    pub(crate) fn new(factory: Box<MachineFactory<S, C, E>>, options: ActorOptions) -> Self {
        Self { factory, options }
    }

    /// Call the factory, start an actor from its machine and read the
    /// initial snapshot. Factory errors are returned untouched.
    pub(crate) fn instantiate_and_start(&self) -> Result<(Actor<S, C, E>, Snapshot<S, C>), BridgeError> {
        let machine = (self.factory)()?;
        let actor = Actor::new(machine, self.options.clone());
        actor.start();
        let initial = actor.snapshot();
        debug!(
            actor = actor.id(),
            session = %actor.session_id(),
            state = initial.value.name(),
            "instantiated actor"
        );
        Ok((actor, initial))
    }

    /// Route every later snapshot of `actor` into `on_change`.
    pub(crate) fn attach<F>(&self, actor: &Actor<S, C, E>, on_change: F) -> Subscription
    where
        F: Fn(&Snapshot<S, C>) + Send + Sync + 'static,
    {
        actor.subscribe(on_change)
    }

    /// Unsubscribe, then stop. Both steps are idempotent.
    pub(crate) fn retire(&self, actor: &Actor<S, C, E>, subscription: &Subscription) {
        subscription.unsubscribe();
        actor.stop();
        debug!(actor = actor.id(), session = %actor.session_id(), "retired actor");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorStatus;
    use crate::builder::{simple_transition, MachineBuilder};
    use crate::{event_enum, state_enum};
    use parking_lot::Mutex;
    use std::sync::Arc;

    state_enum! {
        enum Gate {
            Shut,
            Open,
        }
    }

    event_enum! {
        enum GateEvent {
            Push,
        }
    }

    fn gate() -> Result<Machine<Gate, (), GateEvent>, BuildError> {
        MachineBuilder::new("gate")
            .initial(Gate::Shut)
            .context(())
            .add_transition(simple_transition(Gate::Shut, "Push", Gate::Open))
            .build()
    }

    #[test]
    fn instantiate_starts_actor_at_initial_state() {
        let lifecycle = Lifecycle::new(Box::new(gate), ActorOptions::default());

        let (actor, initial) = lifecycle.instantiate_and_start().unwrap();

        assert_eq!(actor.status(), ActorStatus::Running);
        assert_eq!(initial.value, Gate::Shut);
    }

    #[test]
    fn factory_error_is_configuration_error() {
        let lifecycle: Lifecycle<Gate, (), GateEvent> = Lifecycle::new(
            Box::new(|| MachineBuilder::<Gate, (), GateEvent>::new("gate").context(()).build()),
            ActorOptions::default(),
        );

        let result = lifecycle.instantiate_and_start();

        assert!(matches!(
            result,
            Err(BridgeError::Configuration(BuildError::MissingInitialState))
        ));
    }

    #[test]
    fn retire_silences_and_stops_actor() {
        let lifecycle = Lifecycle::new(Box::new(gate), ActorOptions::default());
        let (actor, _) = lifecycle.instantiate_and_start().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = lifecycle.attach(&actor, move |s| sink.lock().push(s.value.clone()));

        lifecycle.retire(&actor, &sub);
        lifecycle.retire(&actor, &sub);
        actor.send(GateEvent::Push);

        assert!(seen.lock().is_empty());
        assert!(!sub.is_active());
        assert_eq!(actor.status(), ActorStatus::Stopped);
    }

    #[test]
    fn each_instantiation_is_independent() {
        let lifecycle = Lifecycle::new(Box::new(gate), ActorOptions::default());
        let (first, _) = lifecycle.instantiate_and_start().unwrap();
        first.send(GateEvent::Push);

        let (second, initial) = lifecycle.instantiate_and_start().unwrap();

        assert_eq!(first.snapshot().value, Gate::Open);
        assert_eq!(initial.value, Gate::Shut);
        assert_ne!(first.session_id(), second.session_id());
    }
}
