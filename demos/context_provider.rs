//! Sharing state with nested components without passing it through every
//! layer: a provider makes a `StateCell` available to whatever runs inside it.

use reservoir::context::{provide, use_context};
use reservoir::StateCell;

#[derive(Clone)]
struct CountContext(StateCell<u32>);

fn counter_button() {
    let Ok(CountContext(count)) = use_context::<CountContext>() else {
        println!("   <Counter> rendered outside a provider");
        return;
    };
    println!("   <p>Count: {}</p>", count.get());
    println!("   (click)");
    count.update(|n| n + 1);
    println!("   <p>Count: {}</p>", count.get());
}

fn toolbar() {
    // Knows nothing about the count; just renders its children.
    counter_button();
}

fn app() {
    let count = StateCell::new(0);
    provide(CountContext(count.clone()), toolbar);
    provide(CountContext(count.clone()), toolbar);
    println!("   shared count after two mounts: {}", count.get());
}

fn main() {
    tracing_subscriber::fmt().init();

    println!("=== Context provider ===\n");
    println!("1. Inside the provider");
    app();

    println!("\n2. Outside any provider");
    counter_button();

    println!("\n✓ Example complete!");
}
