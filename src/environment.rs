//! Collaborators injected into the view models.
//!
//! Nothing here is global: each view model receives an [`Environment`] at
//! construction and talks to the outside world only through it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{DiscoveryEnvelope, DiscoveryParams, User};
use crate::signal::Property;

/// Remote API used by the feed.
#[async_trait]
pub trait ApiService: Send + Sync {
    /// First page of projects matching `params`.
    async fn fetch_discovery(&self, params: DiscoveryParams)
        -> Result<DiscoveryEnvelope, FetchError>;

    /// Page addressed by a continuation URL from a previous envelope.
    async fn fetch_discovery_page(
        &self,
        pagination_url: String,
    ) -> Result<DiscoveryEnvelope, FetchError>;

    async fn fetch_user_self(&self) -> Result<User, FetchError>;
}

/// Synchronous access to the last known signed-in user.
pub trait CurrentUserSource: Send + Sync {
    fn current_user(&self) -> Option<User>;
}

impl CurrentUserSource for Property<Option<User>> {
    fn current_user(&self) -> Option<User> {
        self.get()
    }
}

/// Fire-and-forget analytics sink.
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, event: &str);
}

/// Analytics sink that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn record(&self, event: &str) {
        tracing::info!(event, "analytics event");
    }
}

#[derive(Clone)]
pub struct Environment {
    pub api: Arc<dyn ApiService>,
    pub session: Arc<dyn CurrentUserSource>,
    pub analytics: Arc<dyn AnalyticsSink>,
}

impl Environment {
    pub fn new(
        api: Arc<dyn ApiService>,
        session: Arc<dyn CurrentUserSource>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            api,
            session,
            analytics,
        }
    }
}
