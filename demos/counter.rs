//! The counter from the Redux walkthrough: actions, a reducer and a store,
//! with a "view" that re-renders whenever the store changes.
//!
//! Run with `RUST_LOG=reservoir=trace` to see each dispatch.

use reservoir::{Action, LoggingMiddleware, Store};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy)]
enum CounterAction {
    Increment,
    Decrement,
}

impl Action for CounterAction {
    fn kind(&self) -> &str {
        match self {
            CounterAction::Increment => "INCREMENT",
            CounterAction::Decrement => "DECREMENT",
        }
    }
}

// Only INCREMENT is handled; anything else leaves the count alone.
fn counter_reducer(state: &i32, action: &CounterAction) -> i32 {
    match action {
        CounterAction::Increment => state + 1,
        _ => *state,
    }
}

fn render(store: &Store<i32, CounterAction>) {
    println!("   <p>Count: {}</p>", store.get_state());
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Counter ===\n");

    let store = Store::builder(0, counter_reducer)
        .middleware(LoggingMiddleware::new("counter"))
        .build();

    println!("1. Initial render");
    render(&store);

    println!("\n2. Subscribing the view");
    let view = store.clone();
    let subscription = store.subscribe(move || render(&view));

    println!("\n3. Clicking Increment twice");
    for _ in 0..2 {
        if let Err(err) = store.dispatch(CounterAction::Increment) {
            eprintln!("   dispatch failed: {err}");
        }
    }

    println!("\n4. Decrement is not handled by this reducer");
    if let Err(err) = store.dispatch(CounterAction::Decrement) {
        eprintln!("   dispatch failed: {err}");
    }

    println!("\n5. Unmounting the view, then incrementing");
    subscription.unsubscribe();
    if let Err(err) = store.dispatch(CounterAction::Increment) {
        eprintln!("   dispatch failed: {err}");
    }
    println!("   (no render) state is now {}", store.get_state());

    println!("\n✓ Example complete!");
}
