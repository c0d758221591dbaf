//! Phases of the interactive dismiss transition.

use crate::mvi::UiState;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TransitionPhase {
    /// No drag in progress.
    #[default]
    Idle,
    /// Dragging without an armed dismissal.
    Tracking,
    /// The drag is driving an interactive dismissal.
    DismissArmed {
        /// Dismiss progress in `[0, 1]`.
        progress: f64,
    },
    /// The dismissal was just completed by the last sample.
    Finishing,
    /// The dismissal was just abandoned by the last sample.
    Cancelling,
}

impl UiState for TransitionPhase {}

impl TransitionPhase {
    pub fn is_armed(&self) -> bool {
        matches!(self, Self::DismissArmed { .. })
    }

    pub fn progress(&self) -> Option<f64> {
        match self {
            Self::DismissArmed { progress } => Some(*progress),
            _ => None,
        }
    }
}
