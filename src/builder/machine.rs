//! Builder for constructing machine definitions.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Context, Event, State};
use crate::machine::{Machine, Transition};

/// Builder for constructing machines with a fluent API.
pub struct MachineBuilder<S, C, E> {
    id: String,
    initial: Option<S>,
    context: Option<C>,
    transitions: Vec<Transition<S, C, E>>,
}

impl<S: State, C: Context, E: Event> MachineBuilder<S, C, E> {
    /// Create a new builder. The id shows up in logs.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            initial: None,
            context: None,
            transitions: Vec::new(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set the initial context (required).
    pub fn context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<S, C, E>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S, C, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<S, C, E>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Build the machine.
    /// Returns an error if required fields are missing or a final state
    /// declares outgoing transitions.
    pub fn build(self) -> Result<Machine<S, C, E>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let context = self.context.ok_or(BuildError::MissingContext)?;

        if let Some(state) = self
            .transitions
            .iter()
            .filter_map(|t| t.source.as_ref())
            .find(|source| source.is_final())
        {
            return Err(BuildError::FinalStateHasTransitions {
                state: state.name().to_string(),
            });
        }

        Ok(Machine::new(self.id, initial, context, self.transitions))
    }
}

impl<S: State, C: Context + Default, E: Event> MachineBuilder<S, C, E> {
    /// Use `C::default()` as the initial context.
    pub fn default_context(self) -> Self {
        self.context(C::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::simple_transition;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum Order {
            Cart,
            Paid,
            Shipped,
        }
        final: [Shipped]
    }

    event_enum! {
        enum OrderEvent {
            Pay,
            Ship,
        }
    }

    #[test]
    fn builder_requires_initial_state() {
        let result = MachineBuilder::<Order, (), OrderEvent>::new("order").build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn builder_requires_context() {
        let result = MachineBuilder::<Order, (), OrderEvent>::new("order")
            .initial(Order::Cart)
            .build();

        assert!(matches!(result, Err(BuildError::MissingContext)));
    }

    #[test]
    fn final_state_cannot_have_transitions() {
        let result = MachineBuilder::<Order, (), OrderEvent>::new("order")
            .initial(Order::Cart)
            .context(())
            .add_transition(simple_transition(Order::Shipped, "Pay", Order::Cart))
            .build();

        assert_eq!(
            result.err(),
            Some(BuildError::FinalStateHasTransitions {
                state: "Shipped".to_string()
            })
        );
    }

    #[test]
    fn machine_without_transitions_is_valid() {
        let machine = MachineBuilder::<Order, (), OrderEvent>::new("idle")
            .initial(Order::Cart)
            .context(())
            .build()
            .unwrap();

        assert!(machine.transitions().is_empty());
        assert_eq!(machine.id(), "idle");
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = MachineBuilder::<Order, u32, OrderEvent>::new("order")
            .initial(Order::Cart)
            .default_context()
            .transitions(vec![
                simple_transition(Order::Cart, "Pay", Order::Paid),
                simple_transition(Order::Paid, "Ship", Order::Shipped),
            ])
            .build()
            .unwrap();

        assert_eq!(machine.initial_state(), &Order::Cart);
        assert_eq!(machine.initial_context(), &0);
        assert_eq!(machine.transitions().len(), 2);
    }
}
