use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub navigator: NavigatorConfig,
}

/// Profile feed tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Rows from the end of the loaded list at which the next page is
    /// requested (default: 3).
    #[serde(default = "default_look_ahead_rows")]
    pub look_ahead_rows: usize,
    /// Clear the list as soon as a refresh starts (default: false).
    #[serde(default)]
    pub clear_on_new_request: bool,
}

/// Project navigator tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    /// Downward translation, in points, that maps to full dismiss progress
    /// (default: 300).
    #[serde(default = "default_dismiss_distance")]
    pub dismiss_distance: f64,
}

fn default_look_ahead_rows() -> usize {
    3
}

fn default_dismiss_distance() -> f64 {
    300.0
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            look_ahead_rows: default_look_ahead_rows(),
            clear_on_new_request: false,
        }
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            dismiss_distance: default_dismiss_distance(),
        }
    }
}
