use crate::config::ReentrancyPolicy;
use crate::reducer::Action;
use crate::store::{Store, Subscription};
use std::fmt;
use std::sync::Arc;

type Updater<T> = Box<dyn Fn(&T) -> T + Send + Sync>;

/// The two transitions a [`StateCell`] understands.
pub enum CellAction<T> {
    Set(T),
    Update(Updater<T>),
}

impl<T: fmt::Debug> fmt::Debug for CellAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellAction::Set(value) => f.debug_tuple("Set").field(value).finish(),
            CellAction::Update(_) => f.write_str("Update(..)"),
        }
    }
}

impl<T: fmt::Debug> Action for CellAction<T> {
    fn kind(&self) -> &str {
        match self {
            CellAction::Set(_) => "SET",
            CellAction::Update(_) => "UPDATE",
        }
    }
}

fn reduce_cell<T: Clone>(state: &T, action: &CellAction<T>) -> T {
    match action {
        CellAction::Set(value) => value.clone(),
        CellAction::Update(f) => f(state),
    }
}

/// A single value with `get`/`set`, for state only one component cares about.
///
/// Setting the cell from one of its own subscribers is allowed: the write is
/// applied once the current notification round finishes.
///
/// # Example
///
/// ```
/// use reservoir::StateCell;
///
/// let count = StateCell::new(0);
/// count.set(count.get() + 1);
/// count.update(|n| n * 10);
/// assert_eq!(count.get(), 10);
/// ```
pub struct StateCell<T> {
    store: Store<T, CellAction<T>>,
}

impl<T> StateCell<T>
where
    T: Clone + fmt::Debug + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        let store = Store::builder(initial, reduce_cell::<T>)
            .reentrancy(ReentrancyPolicy::Queue)
            .build();
        Self { store }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.store.read(T::clone)
    }

    pub fn snapshot(&self) -> Arc<T> {
        self.store.get_state()
    }

    /// Read the value with a function without cloning it. The cell may be
    /// written from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.store.read(f)
    }

    pub fn set(&self, value: T) {
        self.send(CellAction::Set(value));
    }

    /// Replace the value with `f(current)`.
    pub fn update<F>(&self, f: F)
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        self.send(CellAction::Update(Box::new(f)));
    }

    fn send(&self, action: CellAction<T>) {
        // Infallible reducer, no middleware and a queueing store: nothing
        // here can fail, but the error type still has those variants.
        if let Err(err) = self.store.dispatch(action) {
            tracing::warn!(%err, "state cell write dropped");
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    /// The underlying store, for code written against [`Store`].
    pub fn store(&self) -> &Store<T, CellAction<T>> {
        &self.store
    }
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateCell").field(&self.store).finish()
    }
}
