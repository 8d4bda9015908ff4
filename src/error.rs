use thiserror::Error;

/// Failure of a single [`Store::dispatch`](crate::Store::dispatch).
///
/// Whatever the variant, the caller's action was not applied: the state is
/// the pre-dispatch value and no subscriber was notified for the attempt.
/// Actions queued by subscribers under `ReentrancyPolicy::Queue` never
/// surface here; their failures are logged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError<E> {
    #[error("reducer failed: {0}")]
    Reducer(E),
    #[error("dispatch of `{kind}` while another dispatch is in progress")]
    Reentrant { kind: String },
    #[error("action `{kind}` rejected by middleware `{middleware}`")]
    Rejected { kind: String, middleware: String },
}

impl<E> DispatchError<E> {
    /// The reducer error, if this failure came from the reducer.
    pub fn into_reducer_error(self) -> Option<E> {
        match self {
            DispatchError::Reducer(e) => Some(e),
            _ => None,
        }
    }

    pub(crate) fn reason(&self) -> &'static str {
        match self {
            DispatchError::Reducer(_) => "reducer failed",
            DispatchError::Reentrant { .. } => "reentrant dispatch",
            DispatchError::Rejected { .. } => "rejected by middleware",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("no `{type_name}` provided in the current scope")]
    Missing { type_name: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid store config: {0}")]
    Parse(#[from] toml::de::Error),
}
