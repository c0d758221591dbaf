use std::sync::Arc;

use async_trait::async_trait;

use crate::environment::ApiService;
use crate::error::FetchError;
use crate::models::{DiscoveryEnvelope, DiscoveryParams, Project};
use crate::paginate::{Page, PageSource};

/// Discovery endpoints as a [`PageSource`]; the cursor is the envelope's
/// `more_projects` URL.
pub struct DiscoverySource {
    api: Arc<dyn ApiService>,
}

impl DiscoverySource {
    pub fn new(api: Arc<dyn ApiService>) -> Self {
        Self { api }
    }
}

fn into_page(envelope: DiscoveryEnvelope) -> Page<Project, String> {
    Page::new(envelope.projects, envelope.more_projects)
}

#[async_trait]
impl PageSource for DiscoverySource {
    type Params = DiscoveryParams;
    type Cursor = String;
    type Item = Project;

    async fn fetch_first(&self, params: DiscoveryParams) -> Result<Page<Project, String>, FetchError> {
        self.api.fetch_discovery(params).await.map(into_page)
    }

    async fn fetch_next(&self, cursor: String) -> Result<Page<Project, String>, FetchError> {
        self.api.fetch_discovery_page(cursor).await.map(into_page)
    }
}
