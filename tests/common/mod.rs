//! Shared test utilities and scripted collaborators.

#![allow(dead_code, unused_imports)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use backed_feed::error::FetchError;
use backed_feed::models::{Project, User};
use backed_feed::paginate::{Page, PageSource};
use backed_feed::signal::{Signal, Subscription};

/// Collects every value a signal emits.
pub struct Recorded<T> {
    values: Arc<Mutex<Vec<T>>>,
    _subscription: Subscription,
}

impl<T: Clone + Send + Sync + 'static> Recorded<T> {
    pub fn values(&self) -> Vec<T> {
        self.values.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.values.lock().len()
    }

    pub fn last(&self) -> Option<T> {
        self.values.lock().last().cloned()
    }
}

pub fn record<T: Clone + Send + Sync + 'static>(signal: &Signal<T>) -> Recorded<T> {
    let values = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&values);
    let subscription = signal.observe(move |value: &T| sink.lock().push(value.clone()));
    Recorded {
        values,
        _subscription: subscription,
    }
}

/// Poll `condition` until it holds, panicking after two seconds.
pub async fn eventually<F: Fn() -> bool>(what: &str, condition: F) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for {what}");
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

/// Let spawned tasks run for a moment.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

pub fn project(id: u64) -> Project {
    Project {
        id,
        name: format!("Project {id}"),
        deadline: 1_700_000_000 + id as i64,
        is_backing: true,
    }
}

pub fn projects(ids: std::ops::RangeInclusive<u64>) -> Vec<Project> {
    ids.map(project).collect()
}

pub fn user(id: u64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        backed_projects_count: None,
    }
}

// -- Gated page source ---------------------------------------------------------

/// A request seen by [`GatedPages`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCall {
    First(u32),
    Next(u32),
}

type Reply = Result<Page<u32, u32>, FetchError>;

#[derive(Default)]
struct Gate {
    calls: Mutex<Vec<PageCall>>,
    replies: Mutex<Vec<Option<oneshot::Sender<Reply>>>>,
}

/// [`PageSource`] whose fetches block until the test answers them.
#[derive(Clone, Default)]
pub struct GatedPages {
    gate: Arc<Gate>,
}

impl GatedPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PageCall> {
        self.gate.calls.lock().clone()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        eventually(&format!("{count} fetch calls"), || {
            self.gate.calls.lock().len() >= count
        })
        .await;
    }

    /// Answer call number `index`. Returns false if that fetch was aborted.
    pub fn reply(&self, index: usize, reply: Reply) -> bool {
        let sender = self
            .gate
            .replies
            .lock()
            .get_mut(index)
            .and_then(Option::take);
        match sender {
            Some(sender) => sender.send(reply).is_ok(),
            None => false,
        }
    }

    async fn wait(&self, call: PageCall) -> Reply {
        let (tx, rx) = oneshot::channel();
        {
            let mut replies = self.gate.replies.lock();
            replies.push(Some(tx));
            self.gate.calls.lock().push(call);
        }
        rx.await
            .unwrap_or_else(|_| Err(FetchError::request("reply dropped")))
    }
}

#[async_trait]
impl PageSource for GatedPages {
    type Params = u32;
    type Cursor = u32;
    type Item = u32;

    async fn fetch_first(&self, params: u32) -> Reply {
        self.wait(PageCall::First(params)).await
    }

    async fn fetch_next(&self, cursor: u32) -> Reply {
        self.wait(PageCall::Next(cursor)).await
    }
}

pub fn page(items: &[u32], next: Option<u32>) -> Reply {
    Ok(Page::new(items.to_vec(), next))
}
