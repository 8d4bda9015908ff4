//! Hooks that run around every dispatch.

mod middleware;

pub use middleware::{Flow, LoggingMiddleware, Middleware};
