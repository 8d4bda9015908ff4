use crate::reducer::Action;
use tracing::Level;

/// Whether a dispatch may proceed to the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Reject,
}

/// Observes (and may veto) actions flowing through a store.
///
/// Middleware runs in installation order. `before` sees the action and the
/// state it will be applied to; returning [`Flow::Reject`] aborts the
/// dispatch with `DispatchError::Rejected` and later middleware is skipped.
/// `after` runs once the new state is in place and before any subscriber.
///
/// Middleware must not dispatch into the store that invokes it unless the
/// store queues reentrant dispatches.
pub trait Middleware<S, A>: Send + Sync {
    fn name(&self) -> &str;

    fn before(&self, _action: &A, _state: &S) -> Flow {
        Flow::Continue
    }

    fn after(&self, _action: &A, _previous: &S, _next: &S) {}
}

/// Logs each action's kind through `tracing` at a fixed level.
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    name: String,
    level: Level,
}

impl LoggingMiddleware {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Level::DEBUG,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new("logger")
    }
}

// `tracing` macros need the level as a constant.
macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {{
        let level = $level;
        if level == Level::TRACE {
            tracing::trace!($($arg)+)
        } else if level == Level::DEBUG {
            tracing::debug!($($arg)+)
        } else if level == Level::INFO {
            tracing::info!($($arg)+)
        } else if level == Level::WARN {
            tracing::warn!($($arg)+)
        } else {
            tracing::error!($($arg)+)
        }
    }};
}

impl<S, A> Middleware<S, A> for LoggingMiddleware
where
    A: Action,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn before(&self, action: &A, _state: &S) -> Flow {
        log_at!(self.level, middleware = %self.name, kind = action.kind(), "dispatching");
        Flow::Continue
    }

    fn after(&self, action: &A, _previous: &S, _next: &S) {
        log_at!(self.level, middleware = %self.name, kind = action.kind(), "applied");
    }
}
