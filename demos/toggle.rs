//! Toggle Button
//!
//! A two-state machine behind a bridge. A "view" subscribes and renders a
//! label for every snapshot while a "button" dispatches toggles.
//!
//! Key concepts:
//! - Lazy bootstrap on first read
//! - Synchronous propagation to subscribers
//! - Actor teardown when the last view goes away
//!
//! Run with: cargo run --example toggle

use machine_atom::builder::{simple_transition, MachineBuilder};
use machine_atom::{event_enum, state_enum, MachineBridge, Snapshot};

state_enum! {
    enum Toggle {
        Inactive,
        Active,
    }
}

event_enum! {
    enum ToggleEvent {
        Toggle,
    }
}

fn label(snapshot: &Snapshot<Toggle, ()>) -> &'static str {
    match snapshot.value {
        Toggle::Inactive => "Click to activate",
        Toggle::Active => "Active! Click to deactivate",
    }
}

fn main() {
    println!("=== Toggle Button ===\n");

    let bridge = MachineBridge::new(|| {
        MachineBuilder::<Toggle, (), ToggleEvent>::new("toggle")
            .initial(Toggle::Inactive)
            .context(())
            .add_transition(simple_transition(Toggle::Inactive, "Toggle", Toggle::Active))
            .add_transition(simple_transition(Toggle::Active, "Toggle", Toggle::Inactive))
            .build()
    });

    println!("Bridge created, actor live: {}", bridge.is_live());
    println!("[button] {}", label(&bridge.read().unwrap()));
    println!("Actor live after first read: {}\n", bridge.is_live());

    let view = bridge
        .subscribe(|snapshot| println!("[button] {}", label(snapshot)))
        .unwrap();

    for click in 1..=3 {
        println!("click #{click}");
        bridge.dispatch(ToggleEvent::Toggle).unwrap();
    }

    view.unsubscribe();
    println!("\nView gone, actor live: {}", bridge.is_live());

    println!("\n=== Example Complete ===");
}
