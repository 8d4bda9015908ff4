use super::builder::StoreBuilder;
use super::subscription::{Listener, ListenerSet, Subscription};
use crate::config::{ReentrancyPolicy, StoreConfig};
use crate::error::DispatchError;
use crate::middleware::{Flow, Middleware};
use crate::reducer::{Action, Reducer};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::Arc;

pub(crate) type BoxedReducer<S, A, E> = Box<dyn Reducer<S, A, Error = E> + Send + Sync>;

/// Per-store dispatch bookkeeping, only touched while the dispatch lock is held.
struct DispatchSlot<A> {
    active: Cell<bool>,
    queue: RefCell<VecDeque<A>>,
}

/// Marks a dispatch as running; clears the mark and any leftover queued
/// actions when the outermost dispatch returns or unwinds.
struct ActiveDispatch<'a, A> {
    slot: &'a DispatchSlot<A>,
}

impl<'a, A> ActiveDispatch<'a, A> {
    fn enter(slot: &'a DispatchSlot<A>) -> Self {
        slot.active.set(true);
        Self { slot }
    }
}

impl<A> Drop for ActiveDispatch<'_, A> {
    fn drop(&mut self) {
        self.slot.active.set(false);
        self.slot.queue.borrow_mut().clear();
    }
}

struct Inner<S, A, E> {
    state: RwLock<Arc<S>>,
    reducer: BoxedReducer<S, A, E>,
    middleware: Vec<Box<dyn Middleware<S, A>>>,
    listeners: Arc<Mutex<ListenerSet>>,
    // Reentrant so a subscriber on the dispatching thread reaches the
    // reentrancy policy instead of deadlocking. Other threads wait here.
    dispatch: ReentrantMutex<DispatchSlot<A>>,
    config: StoreConfig,
    // Present only under `NotifyPolicy::OnChange`.
    same_state: Option<fn(&S, &S) -> bool>,
}

/// A reducer-driven state container.
///
/// The store holds one immutable state value. [`dispatch`](Self::dispatch)
/// runs the reducer on the current state and an action, swaps in the result
/// and then calls every subscriber, in registration order, before returning.
/// Subscribers take no arguments; they read the new state through
/// [`get_state`](Self::get_state).
///
/// `Store` is a cheap handle: clones share the same state and subscribers.
/// Dispatches from different threads are applied one at a time.
///
/// # Examples
///
/// ```
/// use reservoir::{Action, Store};
///
/// #[derive(Debug)]
/// enum Counter {
///     Increment,
///     Decrement,
/// }
///
/// impl Action for Counter {
///     fn kind(&self) -> &str {
///         match self {
///             Counter::Increment => "INCREMENT",
///             Counter::Decrement => "DECREMENT",
///         }
///     }
/// }
///
/// let store = Store::new(0, |count: &i32, action: &Counter| match action {
///     Counter::Increment => count + 1,
///     Counter::Decrement => *count,
/// });
///
/// store.dispatch(Counter::Increment).unwrap();
/// store.dispatch(Counter::Decrement).unwrap();
/// assert_eq!(*store.get_state(), 1);
/// ```
pub struct Store<S, A, E = Infallible> {
    inner: Arc<Inner<S, A, E>>,
}

impl<S, A> Store<S, A, Infallible>
where
    S: Send + Sync + 'static,
    A: Action + Send + 'static,
{
    /// Create a store from an initial state and a reducer that cannot fail.
    pub fn new<F>(initial: S, reducer: F) -> Self
    where
        F: Fn(&S, &A) -> S + Send + Sync + 'static,
    {
        Self::with_reducer(initial, reducer)
    }
}

impl<S, A, E> Store<S, A, E>
where
    S: Send + Sync + 'static,
    A: Action + Send + 'static,
    E: 'static,
{
    /// Create a store from any [`Reducer`], e.g. one built with
    /// [`fallible`](crate::fallible).
    pub fn with_reducer<R>(initial: S, reducer: R) -> Self
    where
        R: Reducer<S, A, Error = E> + Send + Sync + 'static,
    {
        StoreBuilder::new(initial, reducer).build()
    }

    /// Start configuring a store: middleware and policies.
    pub fn builder<R>(initial: S, reducer: R) -> StoreBuilder<S, A, E>
    where
        R: Reducer<S, A, Error = E> + Send + Sync + 'static,
    {
        StoreBuilder::new(initial, reducer)
    }

    pub(crate) fn from_parts(
        initial: S,
        reducer: BoxedReducer<S, A, E>,
        middleware: Vec<Box<dyn Middleware<S, A>>>,
        config: StoreConfig,
        same_state: Option<fn(&S, &S) -> bool>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(Arc::new(initial)),
                reducer,
                middleware,
                listeners: Arc::new(Mutex::new(ListenerSet::default())),
                dispatch: ReentrantMutex::new(DispatchSlot {
                    active: Cell::new(false),
                    queue: RefCell::new(VecDeque::new()),
                }),
                config,
                same_state,
            }),
        }
    }

    /// The current state snapshot.
    ///
    /// The returned `Arc` keeps that snapshot alive; later dispatches replace
    /// the store's state without touching it.
    pub fn get_state(&self) -> Arc<S> {
        Arc::clone(&self.inner.state.read())
    }

    /// Run `f` on the current state snapshot.
    ///
    /// No lock is held while `f` runs, so it may dispatch to this store; it
    /// keeps seeing the snapshot it was given.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.get_state();
        f(&state)
    }

    /// The policies this store was built with.
    pub fn config(&self) -> StoreConfig {
        self.inner.config
    }

    /// Apply `action` and notify subscribers.
    ///
    /// On error nothing changed: the state is the pre-dispatch value and no
    /// subscriber ran for this action. A reducer panic unwinds through this
    /// call with the same guarantee.
    ///
    /// Calling `dispatch` from inside a running dispatch on the same thread
    /// follows the store's [`ReentrancyPolicy`](crate::ReentrancyPolicy).
    /// Under `Queue`, the nested call returns `Ok(())` immediately and the
    /// action runs after the current notification round. A queued action
    /// that fails is logged and skipped; it does not affect the result of
    /// the call that applied its own action.
    pub fn dispatch(&self, action: A) -> Result<(), DispatchError<E>> {
        let slot = self.inner.dispatch.lock();

        if slot.active.get() {
            return self.dispatch_nested(&slot, action);
        }

        let _active = ActiveDispatch::enter(&slot);
        self.apply(action)?;

        // The caller's action is in place; queued actions stand on their own.
        loop {
            let Some(queued) = slot.queue.borrow_mut().pop_front() else {
                break;
            };
            let kind = queued.kind().to_owned();
            if let Err(err) = self.apply(queued) {
                tracing::warn!(
                    kind = %kind,
                    reason = err.reason(),
                    "queued action not applied"
                );
            }
        }
        Ok(())
    }

    fn dispatch_nested(
        &self,
        slot: &DispatchSlot<A>,
        action: A,
    ) -> Result<(), DispatchError<E>> {
        match self.inner.config.reentrancy {
            ReentrancyPolicy::Reject => {
                tracing::debug!(kind = action.kind(), "rejecting reentrant dispatch");
                Err(DispatchError::Reentrant {
                    kind: action.kind().to_owned(),
                })
            }
            ReentrancyPolicy::Queue => {
                tracing::debug!(kind = action.kind(), "queueing reentrant dispatch");
                slot.queue.borrow_mut().push_back(action);
                Ok(())
            }
        }
    }

    /// One transition: middleware, reducer, swap, notify.
    fn apply(&self, action: A) -> Result<(), DispatchError<E>> {
        let inner = &*self.inner;
        tracing::trace!(kind = action.kind(), "dispatch");

        // Only `apply` writes the state and it runs under the dispatch lock,
        // so `current` stays the latest state until the swap below.
        let current = self.get_state();

        for middleware in &inner.middleware {
            if middleware.before(&action, &current) == Flow::Reject {
                tracing::debug!(
                    kind = action.kind(),
                    middleware = middleware.name(),
                    "action rejected by middleware"
                );
                return Err(DispatchError::Rejected {
                    kind: action.kind().to_owned(),
                    middleware: middleware.name().to_owned(),
                });
            }
        }

        let next = match inner.reducer.reduce(&current, &action) {
            Ok(next) => Arc::new(next),
            Err(err) => {
                tracing::debug!(kind = action.kind(), "reducer failed, state unchanged");
                return Err(DispatchError::Reducer(err));
            }
        };
        *inner.state.write() = Arc::clone(&next);

        for middleware in &inner.middleware {
            middleware.after(&action, &current, &next);
        }

        match inner.same_state {
            Some(same) if same(&current, &next) => {
                tracing::trace!(kind = action.kind(), "state unchanged, skipping notification");
            }
            _ => self.notify(),
        }
        Ok(())
    }

    fn notify(&self) {
        // Run from a snapshot so listeners may (un)subscribe while notified.
        let listeners = self.inner.listeners.lock().snapshot();
        for listener in listeners {
            listener();
        }
    }

    /// Register a listener called after every applied dispatch.
    ///
    /// Registering the same closure twice creates two independent
    /// subscriptions.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let id = self.inner.listeners.lock().insert(listener);
        tracing::trace!(subscription = id, "subscribe");
        Subscription::new(id, &self.inner.listeners)
    }

    /// Subscribe to a derived value.
    ///
    /// `callback` receives the output of `selector` after a dispatch, but only
    /// when it differs from the last value it observed. The first observed
    /// value is the selection at subscription time.
    pub fn select<U, F, C>(&self, selector: F, callback: C) -> Subscription
    where
        U: PartialEq + Send + 'static,
        F: Fn(&S) -> U + Send + Sync + 'static,
        C: Fn(&U) + Send + Sync + 'static,
    {
        let last = Mutex::new(self.read(&selector));
        // Weak: the store owns this listener.
        let store = Arc::downgrade(&self.inner);

        self.subscribe(move || {
            let Some(inner) = store.upgrade() else {
                return;
            };
            let state = Arc::clone(&inner.state.read());
            let selected = selector(&state);
            let mut last = last.lock();
            if *last != selected {
                *last = selected;
                callback(&*last);
            }
        })
    }

    /// Number of live subscriptions, including those made through `select`.
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

impl<S, A, E> Clone for Store<S, A, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: std::fmt::Debug, A, E> std::fmt::Debug for Store<S, A, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &**self.inner.state.read())
            .field("subscribers", &self.inner.listeners.lock().len())
            .field("config", &self.inner.config)
            .finish()
    }
}
