use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::environment::{ApiService, CurrentUserSource};
use crate::error::FetchError;
use crate::models::User;
use crate::signal::Signal;

/// Loads the signed-in user on every appearance: the cached session user
/// first, then a fresh copy from the API.
pub(super) struct UserLoader {
    api: Arc<dyn ApiService>,
    session: Arc<dyn CurrentUserSource>,
    runtime: Handle,
    generation: AtomicU64,
    in_flight: Mutex<Option<JoinHandle<()>>>,
    pub(super) user: Signal<User>,
    pub(super) fetch_errors: Signal<FetchError>,
}

impl UserLoader {
    pub(super) fn new(
        api: Arc<dyn ApiService>,
        session: Arc<dyn CurrentUserSource>,
        runtime: Handle,
    ) -> Self {
        Self {
            api,
            session,
            runtime,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
            user: Signal::new(),
            fetch_errors: Signal::new(),
        }
    }

    pub(super) fn load(self: &Arc<Self>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(cached) = self.session.current_user() {
            tracing::trace!(user_id = cached.id, "emitting cached user");
            self.user.emit(cached);
        }

        let loader = Arc::clone(self);
        let mut in_flight = self.in_flight.lock();
        let task = self.runtime.spawn(async move {
            let result = loader.api.fetch_user_self().await;
            if loader.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(generation, "discarding superseded user fetch");
                return;
            }
            match result {
                Ok(user) => {
                    tracing::debug!(user_id = user.id, "user fetched");
                    loader.user.emit(user);
                }
                Err(error) => {
                    tracing::warn!(%error, "user fetch failed");
                    loader.fetch_errors.emit(error);
                }
            }
        });
        if let Some(previous) = in_flight.replace(task) {
            previous.abort();
        }
    }

    pub(super) fn cancel(&self) {
        if let Some(task) = self.in_flight.lock().take() {
            task.abort();
        }
    }
}
