//! View model for the page-swipe project navigator.
//!
//! [`ProjectNavigator`] combines the interactive dismiss
//! ([`TransitionEngine`]) and page-swipe handling
//! ([`PageSwipeCoordinator`]) behind one surface, and announces the initial
//! pager page once the screen is both configured and loaded.

mod swipe;
pub mod transition;

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::config::NavigatorConfig;
use crate::environment::AnalyticsSink;
use crate::models::{Project, RefTag};
use crate::mvi::{Intent, Reducer, UiState};
use crate::signal::Signal;

pub use swipe::{
    PageSwipeCoordinator, PendingSwipe, SwipeIntent, SwipeOutputs, SwipeReducer, SwipeState,
    PROJECT_SWIPED_EVENT,
};
pub use transition::{
    PanSample, Point, TransitionCommand, TransitionEngine, TransitionOutputs, TransitionPhase,
};

/// First page the pager should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitialPage {
    pub project: Project,
    pub ref_tag: RefTag,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LifecycleState {
    pub configured: Option<InitialPage>,
    pub view_loaded: bool,
    /// Set once the initial page has been announced.
    pub announced: bool,
}

impl LifecycleState {
    /// The page to announce, if this state is ready and has not announced
    /// yet.
    fn ready(&self) -> Option<&InitialPage> {
        match (&self.configured, self.view_loaded, self.announced) {
            (Some(page), true, false) => Some(page),
            _ => None,
        }
    }
}

impl UiState for LifecycleState {}

#[derive(Debug, Clone)]
pub enum LifecycleIntent {
    Configured(InitialPage),
    ViewDidLoad,
    Announced,
}

impl Intent for LifecycleIntent {}

pub struct LifecycleReducer;

impl Reducer for LifecycleReducer {
    type State = LifecycleState;
    type Intent = LifecycleIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            // Reconfiguring after the announcement does not announce again.
            LifecycleIntent::Configured(page) => LifecycleState {
                configured: Some(page),
                ..state
            },
            LifecycleIntent::ViewDidLoad => LifecycleState {
                view_loaded: true,
                ..state
            },
            LifecycleIntent::Announced => LifecycleState {
                announced: true,
                ..state
            },
        }
    }
}

/// Every output of [`ProjectNavigator`].
#[derive(Clone)]
pub struct NavigatorOutputs {
    pub set_initial_pager_view_controller: Signal<InitialPage>,
    pub transition: TransitionOutputs,
    pub swipe: SwipeOutputs,
}

pub struct ProjectNavigator {
    lifecycle: Mutex<LifecycleState>,
    transition: TransitionEngine,
    swipe: PageSwipeCoordinator,
    outputs: NavigatorOutputs,
}

impl ProjectNavigator {
    pub fn new(analytics: Arc<dyn AnalyticsSink>, config: &NavigatorConfig) -> Self {
        let transition = TransitionEngine::new(config.dismiss_distance);
        let swipe = PageSwipeCoordinator::new(analytics);
        let outputs = NavigatorOutputs {
            set_initial_pager_view_controller: Signal::new(),
            transition: transition.outputs().clone(),
            swipe: swipe.outputs().clone(),
        };

        Self {
            lifecycle: Mutex::new(LifecycleState::default()),
            transition,
            swipe,
            outputs,
        }
    }

    pub fn outputs(&self) -> &NavigatorOutputs {
        &self.outputs
    }

    pub fn configure_with(&self, project: Project, ref_tag: RefTag) {
        tracing::debug!(project_id = project.id, %ref_tag, "navigator configured");
        self.apply(LifecycleIntent::Configured(InitialPage { project, ref_tag }));
    }

    pub fn view_did_load(&self) {
        self.apply(LifecycleIntent::ViewDidLoad);
    }

    pub fn pan(&self, sample: PanSample) {
        self.transition.pan(sample);
    }

    pub fn will_transition_to(&self, project: Project, index: usize) {
        self.swipe.will_transition_to(project, index);
    }

    pub fn page_transition_completed(&self, completed: bool, from_index: usize) {
        self.swipe.page_transition_completed(completed, from_index);
    }

    pub fn transition_phase(&self) -> TransitionPhase {
        self.transition.phase()
    }

    fn apply(&self, intent: LifecycleIntent) {
        let announce = {
            let mut state = self.lifecycle.lock();
            let next = LifecycleReducer::reduce(std::mem::take(&mut *state), intent);
            match next.ready().cloned() {
                Some(page) => {
                    *state = LifecycleReducer::reduce(next, LifecycleIntent::Announced);
                    Some(page)
                }
                None => {
                    *state = next;
                    None
                }
            }
        };

        if let Some(page) = announce {
            self.outputs.set_initial_pager_view_controller.emit(page);
        }
    }
}
