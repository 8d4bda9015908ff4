//! # Reservoir
//!
//! Predictable, reducer-driven state management for Rust.
//!
//! Reservoir provides two levels of abstraction for managing shared state:
//!
//! ## Store (application state)
//!
//! A single immutable state value changed only through actions:
//! - `Store<S, A>` - Thread-safe container that applies a reducer to each dispatched action
//! - `Reducer` - Pure `(state, action) -> state` transition, optionally fallible
//! - `Middleware` - Hooks that observe or veto actions around the reducer
//! - Subscribers notified synchronously, in registration order, after every transition
//!
//! ## Local state and context
//!
//! - `StateCell<T>` - A single value with a setter, for state one component owns
//! - `context` - Scoped, type-keyed values for reaching deeply nested callers
//!
//! ```
//! use reservoir::{Action, Store};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Increment;
//!
//! impl Action for Increment {
//!     fn kind(&self) -> &str {
//!         "INCREMENT"
//!     }
//! }
//!
//! let store = Store::new(0, |count: &u32, _: &Increment| count + 1);
//! let renders = Arc::new(AtomicUsize::new(0));
//! let renders_clone = renders.clone();
//! let subscription = store.subscribe(move || {
//!     renders_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! store.dispatch(Increment).unwrap();
//! subscription.unsubscribe();
//! store.dispatch(Increment).unwrap();
//!
//! assert_eq!(*store.get_state(), 2);
//! assert_eq!(renders.load(Ordering::SeqCst), 1);
//! ```

pub mod cell;
pub mod config;
pub mod context;
pub mod error;
pub mod middleware;
pub mod reducer;
pub mod store;

// Re-export main types for convenience
pub use cell::{CellAction, StateCell};
pub use config::{NotifyPolicy, ReentrancyPolicy, StoreConfig};
pub use error::{ConfigError, ContextError, DispatchError};
pub use middleware::{Flow, LoggingMiddleware, Middleware};
pub use reducer::{fallible, replay, Action, Fallible, Reducer, TaggedAction};
pub use store::{Store, StoreBuilder, Subscription, SubscriptionGuard};
