use super::store::{BoxedReducer, Store};
use crate::config::{NotifyPolicy, ReentrancyPolicy, StoreConfig};
use crate::middleware::Middleware;
use crate::reducer::{Action, Reducer};

/// Configures a [`Store`] before it is created.
///
/// ```
/// use reservoir::{LoggingMiddleware, ReentrancyPolicy, Store, TaggedAction};
///
/// let store = Store::builder(0u64, |n: &u64, action: &TaggedAction| match action.kind.as_str() {
///     "TICK" => n + 1,
///     _ => *n,
/// })
/// .middleware(LoggingMiddleware::default())
/// .reentrancy(ReentrancyPolicy::Queue)
/// .build();
///
/// store.dispatch(TaggedAction::new("TICK")).unwrap();
/// assert_eq!(*store.get_state(), 1);
/// ```
pub struct StoreBuilder<S, A, E> {
    initial: S,
    reducer: BoxedReducer<S, A, E>,
    middleware: Vec<Box<dyn Middleware<S, A>>>,
    config: StoreConfig,
    same_state: Option<fn(&S, &S) -> bool>,
}

impl<S, A, E> StoreBuilder<S, A, E>
where
    S: Send + Sync + 'static,
    A: Action + Send + 'static,
    E: 'static,
{
    pub fn new<R>(initial: S, reducer: R) -> Self
    where
        R: Reducer<S, A, Error = E> + Send + Sync + 'static,
    {
        Self {
            initial,
            reducer: Box::new(reducer),
            middleware: Vec::new(),
            config: StoreConfig::default(),
            same_state: None,
        }
    }

    /// Append a middleware; middleware runs in the order it was added.
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<S, A> + 'static,
    {
        self.middleware.push(Box::new(middleware));
        self
    }

    pub fn reentrancy(mut self, policy: ReentrancyPolicy) -> Self {
        self.config.reentrancy = policy;
        self
    }

    pub fn build(self) -> Store<S, A, E> {
        tracing::trace!(
            middleware = self.middleware.len(),
            config = ?self.config,
            "building store"
        );
        Store::from_parts(
            self.initial,
            self.reducer,
            self.middleware,
            self.config,
            self.same_state,
        )
    }
}

impl<S, A, E> StoreBuilder<S, A, E>
where
    S: PartialEq + Send + Sync + 'static,
    A: Action + Send + 'static,
    E: 'static,
{
    /// Notification policy. `OnChange` compares states with `PartialEq`,
    /// which is why it is only offered for comparable states.
    pub fn notify(mut self, policy: NotifyPolicy) -> Self {
        self.config.notify = policy;
        self.same_state = match policy {
            NotifyPolicy::Always => None,
            NotifyPolicy::OnChange => Some(<S as PartialEq>::eq as fn(&S, &S) -> bool),
        };
        self
    }

    /// Apply every policy in `config`.
    pub fn config(self, config: StoreConfig) -> Self {
        self.reentrancy(config.reentrancy).notify(config.notify)
    }
}
