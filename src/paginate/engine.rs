use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{FetchError, ViewModelError};
use crate::mvi::Reducer;
use crate::signal::{Signal, Subscription};

use super::state::{Page, PaginationIntent, PaginationReducer, PaginationState};

/// Fetch collaborator for a [`PaginationEngine`].
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    /// Parameters of a first-page request.
    type Params: Clone + Send + Sync + 'static;
    type Cursor: Clone + PartialEq + Send + Sync + 'static;
    type Item: Clone + PartialEq + Send + Sync + 'static;

    async fn fetch_first(
        &self,
        params: Self::Params,
    ) -> Result<Page<Self::Item, Self::Cursor>, FetchError>;

    async fn fetch_next(
        &self,
        cursor: Self::Cursor,
    ) -> Result<Page<Self::Item, Self::Cursor>, FetchError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationOptions {
    /// Emit an empty list as soon as a new first page is requested, instead
    /// of keeping the old items visible until the new page replaces them.
    pub clear_on_new_request: bool,
}

#[derive(Clone)]
pub struct PaginationOutputs<T> {
    /// Full accumulated list, after every page arrival.
    pub items: Signal<Vec<T>>,
    /// `true` while a fetch is outstanding, emitted on change.
    pub loading: Signal<bool>,
    /// Fetch failures. Diagnostic only: items and cursor are left untouched.
    pub fetch_errors: Signal<FetchError>,
}

impl<T: Send + Sync + 'static> PaginationOutputs<T> {
    fn new() -> Self {
        Self {
            items: Signal::new(),
            loading: Signal::new(),
            fetch_errors: Signal::new(),
        }
    }
}

/// Loads a list one page at a time.
///
/// A value on the first-page trigger starts a new list; a value on the
/// next-page trigger appends the page addressed by the held cursor. At most
/// one fetch is outstanding: next-page triggers are ignored while loading or
/// once the cursor runs out, and a new first-page request aborts whatever
/// is in flight.
pub struct PaginationEngine<S: PageSource> {
    shared: Arc<Shared<S>>,
    _triggers: [Subscription; 2],
}

struct Shared<S: PageSource> {
    source: S,
    options: PaginationOptions,
    runtime: Handle,
    state: Mutex<PaginationState<S::Item, S::Cursor>>,
    /// Last value sent on `loading`. Locked after `state`, never before.
    loading_sent: Mutex<bool>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
    outputs: PaginationOutputs<S::Item>,
}

impl<S: PageSource> PaginationEngine<S> {
    /// Fetches are spawned on the tokio runtime current at construction.
    pub fn new(
        request_first_page_with: &Signal<S::Params>,
        request_next_page_when: &Signal<()>,
        source: S,
        options: PaginationOptions,
    ) -> Result<Self, ViewModelError> {
        let runtime = Handle::try_current().map_err(ViewModelError::NoRuntime)?;
        let shared = Arc::new(Shared {
            source,
            options,
            runtime,
            state: Mutex::new(PaginationState::default()),
            loading_sent: Mutex::new(false),
            in_flight: Mutex::new(None),
            outputs: PaginationOutputs::new(),
        });

        let first_page = {
            let shared = Arc::clone(&shared);
            request_first_page_with.observe(move |params| shared.request_first_page(params.clone()))
        };
        let next_page = {
            let shared = Arc::clone(&shared);
            request_next_page_when.observe(move |_| shared.request_next_page())
        };

        Ok(Self {
            shared,
            _triggers: [first_page, next_page],
        })
    }

    pub fn outputs(&self) -> &PaginationOutputs<S::Item> {
        &self.shared.outputs
    }

    pub fn items(&self) -> Vec<S::Item> {
        self.shared.state.lock().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.lock().loading
    }

    pub fn cursor(&self) -> Option<S::Cursor> {
        self.shared.state.lock().cursor.clone()
    }

    pub fn is_last_page(&self) -> bool {
        self.shared.state.lock().is_last_page()
    }

    pub fn state(&self) -> PaginationState<S::Item, S::Cursor> {
        self.shared.state.lock().clone()
    }
}

impl<S: PageSource> Drop for PaginationEngine<S> {
    fn drop(&mut self) {
        if let Some(task) = self.shared.in_flight.lock().take() {
            task.abort();
        }
    }
}

impl<S: PageSource> Shared<S> {
    /// Apply a completion intent unless a newer first-page request has
    /// superseded `generation`.
    fn reduce_current(
        &self,
        generation: u64,
        intent: PaginationIntent<S::Item, S::Cursor>,
    ) -> Option<PaginationState<S::Item, S::Cursor>> {
        let mut state = self.state.lock();
        if state.generation != generation {
            return None;
        }
        let next = PaginationReducer::reduce(std::mem::take(&mut *state), intent);
        *state = next.clone();
        Some(next)
    }

    /// Send the current `loading` value if it differs from the last one sent.
    ///
    /// The comparison happens under the state lock, so a completion that
    /// runs after a newer request was issued sees `loading == true` and
    /// stays silent.
    fn publish_loading(&self) {
        let changed = {
            let state = self.state.lock();
            let mut sent = self.loading_sent.lock();
            if *sent == state.loading {
                None
            } else {
                *sent = state.loading;
                Some(state.loading)
            }
        };
        if let Some(loading) = changed {
            self.outputs.loading.emit(loading);
        }
    }

    fn request_first_page(self: &Arc<Self>, params: S::Params) {
        let clear = self.options.clear_on_new_request;
        let (generation, was_loading) = {
            let mut state = self.state.lock();
            let was_loading = state.loading;
            let next = PaginationReducer::reduce(
                std::mem::take(&mut *state),
                PaginationIntent::FirstPageRequested { clear },
            );
            let generation = next.generation;
            *state = next;
            (generation, was_loading)
        };

        tracing::debug!(generation, superseded = was_loading, "requesting first page");
        if clear {
            self.outputs.items.emit(Vec::new());
        }
        self.publish_loading();

        let shared = Arc::clone(self);
        self.spawn(async move {
            let result = shared.source.fetch_first(params).await;
            shared.complete(generation, true, result);
        });
    }

    fn request_next_page(self: &Arc<Self>) {
        let request = {
            let mut state = self.state.lock();
            if !state.can_load_next() {
                None
            } else {
                let next = PaginationReducer::reduce(
                    std::mem::take(&mut *state),
                    PaginationIntent::NextPageRequested,
                );
                let request = next.cursor.clone().map(|cursor| (next.generation, cursor));
                *state = next;
                request
            }
        };

        let Some((generation, cursor)) = request else {
            tracing::trace!("next page ignored: loading or no cursor");
            return;
        };

        tracing::debug!(generation, "requesting next page");
        self.publish_loading();

        let shared = Arc::clone(self);
        self.spawn(async move {
            let result = shared.source.fetch_next(cursor).await;
            shared.complete(generation, false, result);
        });
    }

    fn spawn<F>(&self, fetch: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        // Spawn under the lock so a completion that immediately triggers the
        // next fetch cannot have its task aborted by this replacement.
        let mut in_flight = self.in_flight.lock();
        let task = self.runtime.spawn(fetch);
        if let Some(previous) = in_flight.replace(task) {
            previous.abort();
        }
    }

    fn complete(
        &self,
        generation: u64,
        first: bool,
        result: Result<Page<S::Item, S::Cursor>, FetchError>,
    ) {
        match result {
            Ok(page) => {
                let count = page.items.len();
                let intent = PaginationIntent::PageLoaded {
                    generation,
                    first,
                    page,
                };
                let Some(next) = self.reduce_current(generation, intent) else {
                    tracing::debug!(generation, "discarding superseded page");
                    return;
                };
                tracing::debug!(
                    generation,
                    count,
                    total = next.items.len(),
                    last_page = next.cursor.is_none(),
                    "page loaded"
                );
                // `loading` settles first: an items observer may request the
                // next page synchronously.
                self.publish_loading();
                self.outputs.items.emit(next.items);
            }
            Err(error) => {
                let intent = PaginationIntent::PageFailed { generation };
                if self.reduce_current(generation, intent).is_none() {
                    tracing::debug!(generation, %error, "discarding superseded failure");
                    return;
                }
                tracing::warn!(generation, first, %error, "page fetch failed");
                self.publish_loading();
                self.outputs.fetch_errors.emit(error);
            }
        }
    }
}
