//! Domain values exchanged with the API collaborator and the presentation
//! layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    /// Unix timestamp (seconds) at which funding ends.
    pub deadline: i64,
    /// Whether the current user has backed this project.
    #[serde(default)]
    pub is_backing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub backed_projects_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoverySort {
    Magic,
    Popular,
    Newest,
    EndingSoon,
}

/// Filter and ordering criteria for a discovery request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiscoveryParams {
    #[serde(default)]
    pub backed: Option<bool>,
    #[serde(default)]
    pub sort: Option<DiscoverySort>,
    #[serde(default)]
    pub per_page: Option<usize>,
}

impl DiscoveryParams {
    /// Projects the current user backed, soonest deadline first.
    pub fn backed_ending_soon() -> Self {
        Self {
            backed: Some(true),
            sort: Some(DiscoverySort::EndingSoon),
            ..Self::default()
        }
    }
}

/// One page of discovery results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryEnvelope {
    pub projects: Vec<Project>,
    /// Continuation URL for the next page; absent on the last page.
    #[serde(default)]
    pub more_projects: Option<String>,
}

/// Where a project page was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefTag {
    Category,
    Discovery,
    ProfileBacked,
    Search,
}

impl RefTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefTag::Category => "category",
            RefTag::Discovery => "discovery",
            RefTag::ProfileBacked => "profile_backed",
            RefTag::Search => "search",
        }
    }
}

impl std::fmt::Display for RefTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row inside a list of `total` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistPosition {
    pub row: usize,
    pub total: usize,
}

impl PlaylistPosition {
    pub fn new(row: usize, total: usize) -> Self {
        Self { row, total }
    }

    /// True when `row` is within `look_ahead` rows of the end.
    pub fn is_near_end(&self, look_ahead: usize) -> bool {
        self.row.saturating_add(look_ahead) >= self.total
    }
}
