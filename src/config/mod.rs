//! Store behavior policies and how to load them.

mod config;

pub use config::{NotifyPolicy, ReentrancyPolicy, StoreConfig};
