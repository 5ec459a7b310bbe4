//! Restartable Counter
//!
//! A button that counts presses until it is disabled. Once the machine
//! reaches its final state every event is ignored, and only the RESTART
//! signal brings it back with a fresh actor and a zeroed counter.
//!
//! Key concepts:
//! - Context updates through `assign`
//! - Wildcard transitions with `any_state`
//! - Final states and the RESTART signal
//! - Per-actor session ids and history
//!
//! Run with: cargo run --example restartable

use machine_atom::builder::{BuildError, MachineBuilder, TransitionBuilder};
use machine_atom::machine::Machine;
use machine_atom::{event_enum, state_enum, ActorOptions, MachineBridge, RESTART};
use serde::{Deserialize, Serialize};

state_enum! {
    enum Button {
        Inactive,
        Active,
        Final,
    }
    final: [Final]
}

event_enum! {
    enum ButtonEvent {
        Press,
        Disable,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Counter {
    counter: u32,
}

fn machine() -> Result<Machine<Button, Counter, ButtonEvent>, BuildError> {
    MachineBuilder::new("restartable")
        .initial(Button::Inactive)
        .context(Counter { counter: 0 })
        .transition(
            TransitionBuilder::new()
                .from(Button::Inactive)
                .on("Press")
                .to(Button::Active),
        )?
        .transition(
            TransitionBuilder::new()
                .from(Button::Active)
                .on("Press")
                .assign(|ctx: &Counter, _: &ButtonEvent| Counter {
                    counter: ctx.counter + 1,
                }),
        )?
        .transition(
            TransitionBuilder::new()
                .any_state()
                .on("Disable")
                .to(Button::Final),
        )?
        .build()
}

fn main() {
    println!("=== Restartable Counter ===\n");

    let bridge = MachineBridge::with_options(
        machine,
        ActorOptions::new().with_id("restartable").with_history_limit(16),
    );

    let _view = bridge
        .subscribe(|snapshot| {
            println!(
                "  state={:?} counter={} done={}",
                snapshot.value,
                snapshot.context.counter,
                snapshot.is_done()
            )
        })
        .unwrap();

    println!("Session: {:?}\n", bridge.session_id());

    println!("Pressing three times:");
    for _ in 0..3 {
        bridge.dispatch(ButtonEvent::Press).unwrap();
    }

    println!("\nDisabling:");
    bridge.dispatch(ButtonEvent::Disable).unwrap();

    println!("\nPressing a finished machine (ignored):");
    bridge.dispatch(ButtonEvent::Press).unwrap();
    println!("  counter still {}", bridge.read().unwrap().context.counter);

    if let Some(history) = bridge.history() {
        println!("\nPath taken: {:?}", history.get_path());
    }

    println!("\nRestarting:");
    bridge.dispatch(RESTART).unwrap();
    println!("Session: {:?}", bridge.session_id());

    println!("\n=== Example Complete ===");
}
