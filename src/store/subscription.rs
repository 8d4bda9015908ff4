use parking_lot::Mutex;
use std::sync::{Arc, Weak};

pub(crate) type Listener = Arc<dyn Fn() + Send + Sync>;

/// Registered listeners in registration order.
#[derive(Default)]
pub(crate) struct ListenerSet {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

impl ListenerSet {
    pub(crate) fn insert(&mut self, listener: Listener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        match self.entries.iter().position(|(entry, _)| *entry == id) {
            Some(index) => {
                // `remove`, not `swap_remove`: notification order is registration order.
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Clone out the current listeners so they can run without the lock held.
    pub(crate) fn snapshot(&self) -> Vec<Listener> {
        self.entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }
}

/// Handle to one registration made with [`Store::subscribe`](crate::Store::subscribe).
///
/// Dropping a `Subscription` does **not** unsubscribe; call
/// [`unsubscribe`](Self::unsubscribe) or convert it with
/// [`into_guard`](Self::into_guard) for drop-scoped registrations.
/// The handle only holds a weak reference, so it never keeps a store alive.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<ListenerSet>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, listeners: &Arc<Mutex<ListenerSet>>) -> Self {
        Self {
            id,
            listeners: Arc::downgrade(listeners),
        }
    }

    /// Remove this registration. Returns `false` if it was already gone,
    /// which is not an error.
    ///
    /// A listener removed while a notification round is running still
    /// receives that round; it receives nothing from later dispatches.
    pub fn unsubscribe(&self) -> bool {
        let removed = self
            .listeners
            .upgrade()
            .is_some_and(|listeners| listeners.lock().remove(self.id));
        tracing::trace!(subscription = self.id, removed, "unsubscribe");
        removed
    }

    pub fn is_active(&self) -> bool {
        self.listeners
            .upgrade()
            .is_some_and(|listeners| listeners.lock().contains(self.id))
    }

    pub fn into_guard(self) -> SubscriptionGuard {
        SubscriptionGuard {
            subscription: self,
            armed: true,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// RAII guard for a subscription: unsubscribes when dropped.
#[derive(Debug)]
pub struct SubscriptionGuard {
    subscription: Subscription,
    armed: bool,
}

impl SubscriptionGuard {
    /// Give up the guard without unsubscribing.
    pub fn release(mut self) -> Subscription {
        self.armed = false;
        self.subscription.clone()
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if self.armed {
            self.subscription.unsubscribe();
        }
    }
}
