//! Listener registry with explicit subscription handles.
//!
//! A `Listeners<T>` keeps a list of callbacks keyed by a monotonically increasing id.
//! Registering returns a [`Subscription`] which is the only way to remove the callback
//! again; dropping the handle keeps the callback registered.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Callback<T>)>>,
}

impl<T> Registry<T> {
    fn entries(&self) -> MutexGuard<'_, Vec<(u64, Callback<T>)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: u64) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }
}

/// A set of callbacks interested in values of type `T`.
pub struct Listeners<T> {
    registry: Arc<Registry<T>>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(1),
                entries: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Registers `callback` and returns the handle needed to remove it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
        T: 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.entries().push((id, Arc::new(callback)));
        log::trace!("listener {id} subscribed");

        let weak: Weak<Registry<T>> = Arc::downgrade(&self.registry);
        Subscription {
            id,
            remove: Box::new(move |id| weak.upgrade().is_some_and(|r| r.remove(id))),
        }
    }

    /// Calls every registered callback with `value`.
    ///
    /// The registry lock is released before the callbacks run, so a callback may
    /// subscribe or unsubscribe without deadlocking.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Callback<T>> = self
            .registry
            .entries()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in snapshot {
            callback(value);
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.registry.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by [`Listeners::subscribe`].
#[must_use = "a subscription can only be removed through its handle"]
pub struct Subscription {
    id: u64,
    remove: Box<dyn Fn(u64) -> bool + Send + Sync>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Removes the callback. Returns false if it was already gone.
    pub fn unsubscribe(self) -> bool {
        let removed = (self.remove)(self.id);
        log::trace!("listener {} unsubscribed (removed: {removed})", self.id);
        removed
    }
}
