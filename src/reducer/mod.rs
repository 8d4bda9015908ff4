//! Actions and the reducers that turn them into state transitions.
//!
//! A reducer is a pure function of the current state and an action. It never
//! mutates the state it is given; it returns the next state (or the same
//! value back for actions it does not recognize).

mod action;
mod reducer;

pub use action::{Action, TaggedAction};
pub use reducer::{fallible, replay, Fallible, Reducer};
