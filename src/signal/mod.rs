//! Push-based observer lists.
//!
//! A [`Signal`] is a multi-consumer broadcast with no memory: observers only
//! see values emitted after they subscribe. A [`Property`] additionally holds
//! a current value and replays it to each new observer.
//!
//! Emission is synchronous on the emitting thread. Observers are snapshotted
//! before they are called, so an observer may subscribe, dispose or emit
//! without deadlocking.

mod operators;
mod property;
mod subscription;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

pub use property::Property;
pub use subscription::Subscription;

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Observers<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Observer<T>)>>,
}

/// Broadcast stream of values.
///
/// Cloning a `Signal` yields another handle to the same observer list.
pub struct Signal<T> {
    inner: Arc<Observers<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + Sync + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Observers {
                next_id: AtomicU64::new(0),
                entries: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Deliver `value` to every current observer, in subscription order.
    pub fn emit(&self, value: T) {
        let observers: Vec<Observer<T>> = self
            .inner
            .entries
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer(&value);
        }
    }

    /// Register `observer`. It stays registered until the returned
    /// [`Subscription`] is dropped or disposed.
    pub fn observe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.entries.lock().push((id, Arc::new(observer)));

        let weak: Weak<Observers<T>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.entries.lock().retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.inner.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync) {
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&values);
        (values, move |value: &T| sink.lock().push(value.clone()))
    }

    #[test]
    fn emits_to_all_observers_in_order() {
        let signal: Signal<i32> = Signal::new();
        let (first, first_observer) = recorder::<i32>();
        let (second, second_observer) = recorder::<i32>();
        let _a = signal.observe(first_observer);
        let _b = signal.observe(second_observer);

        signal.emit(1);
        signal.emit(2);

        assert_eq!(*first.lock(), vec![1, 2]);
        assert_eq!(*second.lock(), vec![1, 2]);
    }

    #[test]
    fn dropping_subscription_stops_delivery() {
        let signal: Signal<i32> = Signal::new();
        let (values, observer) = recorder::<i32>();
        let subscription = signal.observe(observer);

        signal.emit(1);
        drop(subscription);
        signal.emit(2);

        assert_eq!(*values.lock(), vec![1]);
        assert_eq!(signal.observer_count(), 0);
    }

    #[test]
    fn observer_may_emit_reentrantly() {
        let signal: Signal<i32> = Signal::new();
        let (values, observer) = recorder::<i32>();
        let _log = signal.observe(observer);

        let echo = signal.clone();
        let _echo = signal.observe(move |value| {
            if *value < 3 {
                echo.emit(value + 1);
            }
        });

        signal.emit(1);
        assert_eq!(*values.lock(), vec![1, 2, 3]);
    }

    #[test]
    fn values_before_subscription_are_not_replayed() {
        let signal: Signal<i32> = Signal::new();
        signal.emit(1);
        let (values, observer) = recorder::<i32>();
        let _sub = signal.observe(observer);
        signal.emit(2);
        assert_eq!(*values.lock(), vec![2]);
    }
}
