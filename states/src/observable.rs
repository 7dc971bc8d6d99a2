use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{Listeners, Subscription};

struct Inner<T> {
    value: Mutex<T>,
    listeners: Listeners<T>,
}

/// A shared value that notifies its listeners synchronously on every change.
///
/// Cloning an `Observable` yields another handle to the same value.
pub struct Observable<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.lock())
            .field("listeners", &self.inner.listeners.len())
            .finish()
    }
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(value),
                listeners: Listeners::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock())
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
        T: 'static,
    {
        self.inner.listeners.subscribe(callback)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl<T: Clone> Observable<T> {
    pub fn get(&self) -> T {
        self.lock().clone()
    }

    /// Replaces the value and notifies every listener with the new value.
    pub fn set(&self, value: T) {
        let snapshot = {
            let mut guard = self.lock();
            *guard = value;
            guard.clone()
        };
        self.inner.listeners.emit(&snapshot);
    }

    /// Mutates the value in place, then notifies listeners.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let snapshot = {
            let mut guard = self.lock();
            f(&mut guard);
            guard.clone()
        };
        self.inner.listeners.emit(&snapshot);
    }
}

impl<T: Clone + PartialEq> Observable<T> {
    /// Like [`Observable::set`] but stays silent when the value does not change.
    ///
    /// Returns whether listeners were notified.
    pub fn set_if_changed(&self, value: T) -> bool {
        let snapshot = {
            let mut guard = self.lock();
            if *guard == value {
                return false;
            }
            *guard = value;
            guard.clone()
        };
        self.inner.listeners.emit(&snapshot);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_set_notifies_with_new_value() {
        let observable = Observable::new(String::from("a"));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sub = {
            let seen = Arc::clone(&seen);
            observable.subscribe(move |v: &String| {
                seen.lock().unwrap().push(v.clone());
            })
        };

        observable.set("b".to_owned());
        observable.update(|v| v.push('c'));

        assert_eq!(*seen.lock().unwrap(), vec!["b".to_owned(), "bc".to_owned()]);
        assert_eq!(observable.get(), "bc");
        assert!(sub.unsubscribe());
        assert_eq!(observable.listener_count(), 0);
    }

    #[test]
    fn test_set_if_changed_skips_equal_values() {
        let observable = Observable::new(false);
        let calls = Arc::new(AtomicUsize::new(0));
        let _sub = {
            let calls = Arc::clone(&calls);
            observable.subscribe(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        assert!(!observable.set_if_changed(false));
        assert!(observable.set_if_changed(true));
        assert!(!observable.set_if_changed(true));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_can_read_value_while_notified() {
        let observable = Observable::new(1_u32);
        let reader = observable.clone();
        let last = Arc::new(AtomicUsize::new(0));

        let _sub = {
            let last = Arc::clone(&last);
            observable.subscribe(move |_| {
                last.store(reader.get() as usize, Ordering::SeqCst);
            })
        };

        observable.set(7);
        assert_eq!(last.load(Ordering::SeqCst), 7);
    }
}
