//! Transition rules for the interactive dismiss.

use crate::mvi::Reducer;

use super::intent::TransitionIntent;
use super::state::TransitionPhase;

/// Command a phase change asks the presentation layer to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionCommand {
    /// Start the (interactive) modal dismissal.
    Dismiss,
    Update(f64),
    Cancel,
    Finish,
}

/// Map a downward translation onto dismiss progress in `[0, 1]`.
///
/// Monotonic in `translation_y`; anything at or above `dismiss_distance`
/// is full progress.
pub fn dismiss_progress(translation_y: f64, dismiss_distance: f64) -> f64 {
    let ratio = translation_y / dismiss_distance;
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Reducer for transition phase changes.
///
/// - Not armed: a dragging overscroll (`offset.y <= 0`, `translation.y > 0`)
///   arms the dismissal; any other drag is `Tracking`, a release is `Idle`.
/// - Armed and dragging: stays armed while `offset.y <= 0`, cancels as soon
///   as the content scrolls back above its top.
/// - Armed and released: finishes only if still overscrolled
///   (`offset.y < 0`) and not flicking back up (`velocity.y >= 0`);
///   otherwise cancels. A release at exactly `offset.y == 0` cancels.
pub struct TransitionReducer;

impl Reducer for TransitionReducer {
    type State = TransitionPhase;
    type Intent = TransitionIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        let TransitionIntent::Pan {
            sample,
            dismiss_distance,
        } = intent;
        let progress = dismiss_progress(sample.translation.y, dismiss_distance);

        match state {
            TransitionPhase::DismissArmed { .. } => {
                if sample.is_dragging {
                    if sample.content_offset.y <= 0.0 {
                        TransitionPhase::DismissArmed { progress }
                    } else {
                        TransitionPhase::Cancelling
                    }
                } else if sample.content_offset.y < 0.0 && sample.velocity.y >= 0.0 {
                    TransitionPhase::Finishing
                } else {
                    TransitionPhase::Cancelling
                }
            }

            // Finishing and Cancelling only last for the sample that
            // produced them.
            TransitionPhase::Idle
            | TransitionPhase::Tracking
            | TransitionPhase::Finishing
            | TransitionPhase::Cancelling => {
                if !sample.is_dragging {
                    TransitionPhase::Idle
                } else if sample.is_overscrolled() {
                    TransitionPhase::DismissArmed { progress }
                } else {
                    TransitionPhase::Tracking
                }
            }
        }
    }
}

/// Commands implied by moving from `from` to `to`, in emission order.
pub fn commands_between(from: &TransitionPhase, to: &TransitionPhase) -> Vec<TransitionCommand> {
    match (from.is_armed(), to) {
        (false, TransitionPhase::DismissArmed { progress }) => {
            vec![TransitionCommand::Dismiss, TransitionCommand::Update(*progress)]
        }
        (true, TransitionPhase::DismissArmed { progress }) => {
            vec![TransitionCommand::Update(*progress)]
        }
        (true, TransitionPhase::Finishing) => vec![TransitionCommand::Finish],
        (true, TransitionPhase::Cancelling) => vec![TransitionCommand::Cancel],
        _ => Vec::new(),
    }
}
