use parking_lot::Mutex;

use super::{Signal, Subscription};

/// A value plus the observers interested in its changes.
///
/// `observe` replays the current value immediately, then delivers every
/// subsequent `set`.
pub struct Property<T> {
    value: Mutex<T>,
    changes: Signal<T>,
}

impl<T: Clone + Send + Sync + 'static> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
            changes: Signal::new(),
        }
    }

    pub fn get(&self) -> T {
        self.value.lock().clone()
    }

    pub fn set(&self, value: T) {
        *self.value.lock() = value.clone();
        self.changes.emit(value);
    }

    /// Changes only, without the replay.
    pub fn signal(&self) -> &Signal<T> {
        &self.changes
    }

    pub fn observe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let current = self.get();
        observer(&current);
        self.changes.observe(observer)
    }
}

impl<T: Clone + Default + Send + Sync + 'static> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::Property;

    #[test]
    fn observe_replays_current_value() {
        let property = Property::new(1);
        property.set(2);

        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&values);
        let _sub = property.observe(move |v| sink.lock().push(*v));
        property.set(3);

        assert_eq!(*values.lock(), vec![2, 3]);
        assert_eq!(property.get(), 3);
    }

    #[test]
    fn signal_skips_replay() {
        let property = Property::new("a".to_string());
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&values);
        let _sub = property.signal().observe(move |v: &String| sink.lock().push(v.clone()));
        property.set("b".to_string());
        assert_eq!(*values.lock(), vec!["b".to_string()]);
    }
}
