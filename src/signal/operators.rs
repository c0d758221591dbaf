//! Derived signals.
//!
//! Each operator registers a detached observer on its source(s), so a derived
//! signal keeps producing for as long as the source lives.

use std::sync::Arc;

use parking_lot::Mutex;

use super::Signal;

impl<T: Send + Sync + 'static> Signal<T> {
    pub fn map<U, F>(&self, transform: F) -> Signal<U>
    where
        U: Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let output = Signal::new();
        let sink = output.clone();
        self.observe(move |value| sink.emit(transform(value))).detach();
        output
    }

    pub fn filter_map<U, F>(&self, transform: F) -> Signal<U>
    where
        U: Send + Sync + 'static,
        F: Fn(&T) -> Option<U> + Send + Sync + 'static,
    {
        let output = Signal::new();
        let sink = output.clone();
        self.observe(move |value| {
            if let Some(mapped) = transform(value) {
                sink.emit(mapped);
            }
        })
        .detach();
        output
    }

    /// Replace every value with `()`.
    pub fn ignore_values(&self) -> Signal<()> {
        self.map(|_| ())
    }
}

impl<T: Clone + Send + Sync + 'static> Signal<T> {
    pub fn filter<F>(&self, predicate: F) -> Signal<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter_map(move |value| predicate(value).then(|| value.clone()))
    }

    /// Interleave the values of every source, in emission order.
    pub fn merge<'a, I>(sources: I) -> Signal<T>
    where
        I: IntoIterator<Item = &'a Signal<T>>,
    {
        let output = Signal::new();
        for source in sources {
            let sink = output.clone();
            source.observe(move |value: &T| sink.emit(value.clone())).detach();
        }
        output
    }

    /// Pair every value of `sampler` with the latest value of `self`.
    ///
    /// Sampler values arriving before `self` has produced anything are
    /// dropped.
    pub fn take_pair_when<U>(&self, sampler: &Signal<U>) -> Signal<(T, U)>
    where
        U: Clone + Send + Sync + 'static,
    {
        let latest: Arc<Mutex<Option<T>>> = Arc::new(Mutex::new(None));

        let store = Arc::clone(&latest);
        self.observe(move |value| *store.lock() = Some(value.clone()))
            .detach();

        let output = Signal::new();
        let sink = output.clone();
        sampler
            .observe(move |sample| {
                let current = latest.lock().clone();
                if let Some(current) = current {
                    sink.emit((current, sample.clone()));
                }
            })
            .detach();
        output
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Signal<T> {
    /// Drop values equal to the one emitted immediately before.
    pub fn skip_repeats(&self) -> Signal<T> {
        let previous: Mutex<Option<T>> = Mutex::new(None);
        self.filter_map(move |value| {
            let mut previous = previous.lock();
            if previous.as_ref() == Some(value) {
                return None;
            }
            *previous = Some(value.clone());
            Some(value.clone())
        })
    }
}
