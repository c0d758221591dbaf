//! View model for the profile screen: the signed-in user and the projects
//! they backed, loaded page by page.

mod source;
mod user;

use std::sync::Arc;

use serde::Serialize;
use tokio::runtime::Handle;

use crate::config::FeedConfig;
use crate::environment::Environment;
use crate::error::{FetchError, ViewModelError};
use crate::models::{DiscoveryParams, PlaylistPosition, Project, RefTag, User};
use crate::paginate::{PaginationEngine, PaginationOptions};
use crate::signal::{Signal, Subscription};

pub use source::DiscoverySource;

use user::UserLoader;

/// Request to open a project page from the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectNavigation {
    pub project: Project,
    /// The list the project was tapped in, for swiping between neighbours.
    pub playlist: Vec<Project>,
    pub ref_tag: RefTag,
}

#[derive(Clone)]
pub struct ProfileOutputs {
    pub user: Signal<User>,
    pub backed_projects: Signal<Vec<Project>>,
    pub is_refreshing: Signal<bool>,
    pub go_to_project: Signal<ProjectNavigation>,
    pub go_to_settings: Signal<()>,
    /// Row to scroll to after the navigator moved to another project.
    pub scroll_to_project_item: Signal<usize>,
    pub show_empty_state: Signal<bool>,
    /// Demoted failures from both the project and user fetches.
    pub fetch_errors: Signal<FetchError>,
}

struct ProfileInputs {
    view_will_appear: Signal<bool>,
    refresh: Signal<()>,
    will_display_row: Signal<PlaylistPosition>,
    transitioned_to_project: Signal<PlaylistPosition>,
    project_tapped: Signal<Project>,
    settings_button_tapped: Signal<()>,
}

impl ProfileInputs {
    fn new() -> Self {
        Self {
            view_will_appear: Signal::new(),
            refresh: Signal::new(),
            will_display_row: Signal::new(),
            transitioned_to_project: Signal::new(),
            project_tapped: Signal::new(),
            settings_button_tapped: Signal::new(),
        }
    }
}

pub struct ProfileFeed {
    inputs: ProfileInputs,
    outputs: ProfileOutputs,
    projects: PaginationEngine<DiscoverySource>,
    users: Arc<UserLoader>,
    _appearances: Subscription,
}

impl ProfileFeed {
    /// Must be called inside a tokio runtime; fetches are spawned on it.
    pub fn new(env: &Environment, config: &FeedConfig) -> Result<Self, ViewModelError> {
        let runtime = Handle::try_current().map_err(ViewModelError::NoRuntime)?;
        let inputs = ProfileInputs::new();

        let first_page = Signal::merge([
            &inputs.view_will_appear.filter(|animated| !animated).ignore_values(),
            &inputs.refresh,
        ])
        .map(|_| DiscoveryParams::backed_ending_soon());

        let look_ahead = config.look_ahead_rows;
        let next_page = Signal::merge([&inputs.will_display_row, &inputs.transitioned_to_project])
            .map(move |position| position.is_near_end(look_ahead))
            .skip_repeats()
            .filter(|near_end| *near_end)
            .ignore_values();

        let projects = PaginationEngine::new(
            &first_page,
            &next_page,
            DiscoverySource::new(Arc::clone(&env.api)),
            PaginationOptions {
                clear_on_new_request: config.clear_on_new_request,
            },
        )?;

        let users = Arc::new(UserLoader::new(
            Arc::clone(&env.api),
            Arc::clone(&env.session),
            runtime,
        ));
        let appearances = {
            let users = Arc::clone(&users);
            inputs.view_will_appear.observe(move |_| users.load())
        };

        let paged = projects.outputs();
        let outputs = ProfileOutputs {
            user: users.user.clone(),
            backed_projects: paged.items.clone(),
            is_refreshing: paged.loading.clone(),
            go_to_project: paged
                .items
                .take_pair_when(&inputs.project_tapped)
                .map(|(playlist, project)| ProjectNavigation {
                    project: project.clone(),
                    playlist: playlist.clone(),
                    ref_tag: RefTag::ProfileBacked,
                }),
            go_to_settings: inputs.settings_button_tapped.clone(),
            scroll_to_project_item: inputs.transitioned_to_project.map(|position| position.row),
            show_empty_state: paged.items.map(|items| items.is_empty()),
            fetch_errors: Signal::merge([&paged.fetch_errors, &users.fetch_errors]),
        };

        Ok(Self {
            inputs,
            outputs,
            projects,
            users,
            _appearances: appearances,
        })
    }

    pub fn outputs(&self) -> &ProfileOutputs {
        &self.outputs
    }

    pub fn view_will_appear(&self, animated: bool) {
        tracing::trace!(animated, "profile will appear");
        self.inputs.view_will_appear.emit(animated);
    }

    /// Pull-to-refresh.
    pub fn refresh(&self) {
        self.inputs.refresh.emit(());
    }

    pub fn will_display_row(&self, row: usize, total: usize) {
        self.inputs
            .will_display_row
            .emit(PlaylistPosition::new(row, total));
    }

    /// The navigator opened from this feed moved to `row`.
    pub fn transitioned_to_project(&self, row: usize, total: usize) {
        self.inputs
            .transitioned_to_project
            .emit(PlaylistPosition::new(row, total));
    }

    pub fn project_tapped(&self, project: Project) {
        self.inputs.project_tapped.emit(project);
    }

    pub fn settings_button_tapped(&self) {
        self.inputs.settings_button_tapped.emit(());
    }

    pub fn backed_projects(&self) -> Vec<Project> {
        self.projects.items()
    }

    pub fn is_refreshing(&self) -> bool {
        self.projects.is_loading()
    }
}

impl Drop for ProfileFeed {
    fn drop(&mut self) {
        self.users.cancel();
    }
}
