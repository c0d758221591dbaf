//! In-memory collaborators for demos and tests.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::environment::{AnalyticsSink, ApiService};
use crate::error::FetchError;
use crate::models::{DiscoveryEnvelope, DiscoveryParams, DiscoverySort, Project, User};

const DEFAULT_PAGE_SIZE: usize = 3;
const DISCOVER_PATH: &str = "discover";

/// Contents of a JSON fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

/// [`ApiService`] answering from a fixed project list.
///
/// Continuation cursors look like `discover?page=2&backed=true&sort=ending_soon`.
pub struct FixtureApi {
    projects: Vec<Project>,
    user: Option<User>,
    page_size: usize,
    delay: Option<Duration>,
    requests: Mutex<Vec<String>>,
}

impl FixtureApi {
    pub fn new(projects: Vec<Project>, user: Option<User>) -> Self {
        Self {
            projects,
            user,
            page_size: DEFAULT_PAGE_SIZE,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn from_data(data: FixtureData) -> Self {
        let mut api = Self::new(data.projects, data.user);
        if let Some(page_size) = data.page_size {
            api.page_size = page_size.max(1);
        }
        api
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let data: FixtureData = serde_json::from_str(&content)?;
        Ok(Self::from_data(data))
    }

    /// A small backed-projects list and a signed-in user.
    pub fn sample() -> Self {
        let names = [
            "Pocket Synth",
            "Tiny Forest",
            "Harbor Lights",
            "Moth Atlas",
            "Clay Robots",
            "Night Market",
            "Paper Orbit",
        ];
        let projects = names
            .iter()
            .enumerate()
            .map(|(i, name)| Project {
                id: i as u64 + 1,
                name: (*name).to_string(),
                deadline: 1_700_000_000 + (names.len() - i) as i64 * 86_400,
                is_backing: i != 3,
            })
            .collect();
        let user = User {
            id: 42,
            name: "Blob".into(),
            backed_projects_count: Some(6),
        };
        Self::new(projects, Some(user))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sleep this long before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every request served so far, as a path-like description.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    async fn respond(&self, request: String) {
        tracing::trace!(%request, "fixture request");
        self.requests.lock().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn query(&self, params: &DiscoveryParams) -> Vec<Project> {
        let mut projects: Vec<Project> = self
            .projects
            .iter()
            .filter(|p| params.backed.map_or(true, |backed| p.is_backing == backed))
            .cloned()
            .collect();
        match params.sort {
            Some(DiscoverySort::EndingSoon) => projects.sort_by_key(|p| p.deadline),
            Some(DiscoverySort::Newest) => projects.sort_by_key(|p| std::cmp::Reverse(p.id)),
            Some(DiscoverySort::Magic) | Some(DiscoverySort::Popular) | None => {}
        }
        projects
    }

    fn page(&self, params: &DiscoveryParams, page: usize) -> DiscoveryEnvelope {
        let per_page = params.per_page.unwrap_or(self.page_size).max(1);
        let all = self.query(params);
        let start = (page - 1).saturating_mul(per_page).min(all.len());
        let end = start.saturating_add(per_page).min(all.len());
        let more_projects = (end < all.len()).then(|| encode_cursor(params, page + 1));
        DiscoveryEnvelope {
            projects: all[start..end].to_vec(),
            more_projects,
        }
    }
}

fn sort_name(sort: DiscoverySort) -> &'static str {
    match sort {
        DiscoverySort::Magic => "magic",
        DiscoverySort::Popular => "popular",
        DiscoverySort::Newest => "newest",
        DiscoverySort::EndingSoon => "ending_soon",
    }
}

fn encode_cursor(params: &DiscoveryParams, page: usize) -> String {
    let mut url = format!("{DISCOVER_PATH}?page={page}");
    if let Some(backed) = params.backed {
        url.push_str(&format!("&backed={backed}"));
    }
    if let Some(sort) = params.sort {
        url.push_str(&format!("&sort={}", sort_name(sort)));
    }
    if let Some(per_page) = params.per_page {
        url.push_str(&format!("&per_page={per_page}"));
    }
    url
}

fn decode_cursor(cursor: &str) -> Result<(DiscoveryParams, usize), FetchError> {
    let invalid = || FetchError::InvalidCursor(cursor.to_string());

    let query = cursor
        .strip_prefix(DISCOVER_PATH)
        .and_then(|rest| rest.strip_prefix('?'))
        .ok_or_else(invalid)?;

    let mut params = DiscoveryParams::default();
    let mut page = None;
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').ok_or_else(invalid)?;
        match key {
            "page" => page = Some(value.parse::<usize>().map_err(|_| invalid())?),
            "backed" => params.backed = Some(value.parse::<bool>().map_err(|_| invalid())?),
            "per_page" => params.per_page = Some(value.parse::<usize>().map_err(|_| invalid())?),
            "sort" => {
                let sort = [
                    DiscoverySort::Magic,
                    DiscoverySort::Popular,
                    DiscoverySort::Newest,
                    DiscoverySort::EndingSoon,
                ]
                .into_iter()
                .find(|sort| sort_name(*sort) == value)
                .ok_or_else(invalid)?;
                params.sort = Some(sort);
            }
            _ => return Err(invalid()),
        }
    }

    match page {
        Some(page) if page >= 1 => Ok((params, page)),
        _ => Err(invalid()),
    }
}

#[async_trait]
impl ApiService for FixtureApi {
    async fn fetch_discovery(&self, params: DiscoveryParams) -> Result<DiscoveryEnvelope, FetchError> {
        self.respond(encode_cursor(&params, 1)).await;
        Ok(self.page(&params, 1))
    }

    async fn fetch_discovery_page(&self, pagination_url: String) -> Result<DiscoveryEnvelope, FetchError> {
        self.respond(pagination_url.clone()).await;
        let (params, page) = decode_cursor(&pagination_url)?;
        Ok(self.page(&params, page))
    }

    async fn fetch_user_self(&self) -> Result<User, FetchError> {
        self.respond("me".to_string()).await;
        self.user.clone().ok_or(FetchError::Unauthenticated)
    }
}

/// [`AnalyticsSink`] that remembers every event.
#[derive(Debug, Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<String>>,
}

impl RecordingAnalytics {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn record(&self, event: &str) {
        tracing::debug!(event, "analytics event");
        self.events.lock().push(event.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> FixtureApi {
        FixtureApi::sample().with_page_size(2)
    }

    #[test]
    fn cursor_round_trips_params() {
        let params = DiscoveryParams::backed_ending_soon();
        let cursor = encode_cursor(&params, 3);
        assert_eq!(cursor, "discover?page=3&backed=true&sort=ending_soon");
        assert_eq!(decode_cursor(&cursor), Ok((params, 3)));
    }

    #[test]
    fn malformed_cursors_are_rejected() {
        for cursor in ["", "discover", "discover?page=0", "elsewhere?page=2", "discover?page=2&sort=weird"] {
            assert_eq!(
                decode_cursor(cursor),
                Err(FetchError::InvalidCursor(cursor.to_string())),
                "{cursor}"
            );
        }
    }

    #[tokio::test]
    async fn backed_query_filters_and_sorts_by_deadline() {
        let api = api();
        let first = api
            .fetch_discovery(DiscoveryParams::backed_ending_soon())
            .await
            .unwrap();
        assert_eq!(first.projects.iter().map(|p| p.id).collect::<Vec<_>>(), vec![7, 6]);
        assert!(first.projects.iter().all(|p| p.is_backing));

        let mut ids = Vec::new();
        let mut cursor = first.more_projects;
        while let Some(next) = cursor {
            let page = api.fetch_discovery_page(next).await.unwrap();
            ids.extend(page.projects.iter().map(|p| p.id));
            cursor = page.more_projects;
        }
        // Project 4 is not backed.
        assert_eq!(ids, vec![5, 3, 2, 1]);
    }

    #[tokio::test]
    async fn huge_per_page_returns_the_rest() {
        let api = api();
        let cursor = format!("discover?page=1&backed=true&per_page={}", usize::MAX);
        let page = api.fetch_discovery_page(cursor).await.unwrap();
        assert_eq!(page.projects.len(), 6);
        assert!(page.more_projects.is_none());
    }

    #[tokio::test]
    async fn missing_user_is_unauthenticated() {
        let api = FixtureApi::new(Vec::new(), None);
        assert_eq!(api.fetch_user_self().await, Err(FetchError::Unauthenticated));
    }

    #[test]
    fn fixture_data_parses_with_defaults() {
        let data: FixtureData =
            serde_json::from_str(r#"{"projects":[{"id":1,"name":"A","deadline":5}]}"#).unwrap();
        assert!(data.user.is_none());
        assert!(!data.projects[0].is_backing);
        assert_eq!(FixtureApi::from_data(data).page_size, DEFAULT_PAGE_SIZE);
    }
}
