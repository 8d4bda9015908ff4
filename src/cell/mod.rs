//! Local state: a single value with a setter, built on a [`Store`](crate::Store).

mod cell;

pub use cell::{CellAction, StateCell};
