//! Scoped values resolved by type, for state that must reach deeply nested
//! callers without being threaded through every signature.
//!
//! Prefer passing a [`Store`](crate::Store) handle explicitly. Use this when
//! an intermediate layer has no business knowing about the value.

mod context;

pub use context::{provide, try_use_context, use_context};
