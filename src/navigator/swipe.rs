//! Page-swipe completion handling.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::environment::AnalyticsSink;
use crate::models::Project;
use crate::mvi::{Intent, Reducer, UiState};
use crate::signal::Signal;

/// Analytics event recorded for every completed swipe.
pub const PROJECT_SWIPED_EVENT: &str = "Project Swiped";

#[derive(Debug, Clone, PartialEq)]
pub struct PendingSwipe {
    pub project: Project,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwipeState {
    /// Target announced by the pager but not yet settled.
    pub pending: Option<PendingSwipe>,
    /// Target consumed by the most recent completed swipe.
    pub settled: Option<PendingSwipe>,
}

impl UiState for SwipeState {}

#[derive(Debug, Clone)]
pub enum SwipeIntent {
    WillTransition { project: Project, index: usize },
    TransitionFinished { completed: bool },
}

impl Intent for SwipeIntent {}

pub struct SwipeReducer;

impl Reducer for SwipeReducer {
    type State = SwipeState;
    type Intent = SwipeIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            SwipeIntent::WillTransition { project, index } => SwipeState {
                pending: Some(PendingSwipe { project, index }),
                settled: None,
            },
            SwipeIntent::TransitionFinished { completed: true } => SwipeState {
                pending: None,
                settled: state.pending,
            },
            // An abandoned swipe discards its target.
            SwipeIntent::TransitionFinished { completed: false } => SwipeState::default(),
        }
    }
}

#[derive(Clone)]
pub struct SwipeOutputs {
    pub notify_delegate_transitioned_to_project_index: Signal<usize>,
    pub set_needs_status_bar_appearance_update: Signal<()>,
}

/// Turns pager callbacks into delegate notifications and analytics.
pub struct PageSwipeCoordinator {
    analytics: Arc<dyn AnalyticsSink>,
    state: Mutex<SwipeState>,
    outputs: SwipeOutputs,
}

impl PageSwipeCoordinator {
    pub fn new(analytics: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            analytics,
            state: Mutex::new(SwipeState::default()),
            outputs: SwipeOutputs {
                notify_delegate_transitioned_to_project_index: Signal::new(),
                set_needs_status_bar_appearance_update: Signal::new(),
            },
        }
    }

    pub fn outputs(&self) -> &SwipeOutputs {
        &self.outputs
    }

    pub fn pending(&self) -> Option<PendingSwipe> {
        self.state.lock().pending.clone()
    }

    pub fn will_transition_to(&self, project: Project, index: usize) {
        let mut state = self.state.lock();
        *state = SwipeReducer::reduce(
            std::mem::take(&mut *state),
            SwipeIntent::WillTransition { project, index },
        );
    }

    pub fn page_transition_completed(&self, completed: bool, from_index: usize) {
        let settled = {
            let mut state = self.state.lock();
            *state = SwipeReducer::reduce(
                std::mem::take(&mut *state),
                SwipeIntent::TransitionFinished { completed },
            );
            state.settled.clone()
        };

        if !completed {
            tracing::trace!(from_index, "page swipe abandoned");
            return;
        }

        self.outputs.set_needs_status_bar_appearance_update.emit(());

        let Some(swipe) = settled else {
            tracing::debug!(from_index, "page swipe completed without a pending target");
            return;
        };

        tracing::info!(
            from_index,
            to_index = swipe.index,
            project_id = swipe.project.id,
            "project swiped"
        );
        self.outputs
            .notify_delegate_transitioned_to_project_index
            .emit(swipe.index);
        self.analytics.record(PROJECT_SWIPED_EVENT);
    }
}
