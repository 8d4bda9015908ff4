//! Reducer-driven state management with stores.
//!
//! A [`Store`] owns one immutable state value. Actions go in through
//! `dispatch`, a reducer computes the replacement state, and subscribers are
//! told about it afterwards.

mod builder;
mod store;
mod subscription;

pub use builder::StoreBuilder;
pub use store::Store;
pub use subscription::{Subscription, SubscriptionGuard};
