//! Interactive dismiss driven by pan samples.
//!
//! [`TransitionEngine`] feeds each [`PanSample`] through
//! [`TransitionReducer`] and turns the resulting phase change into
//! commands for the presentation layer.

mod intent;
mod reducer;
mod state;

use parking_lot::Mutex;

use crate::mvi::Reducer;
use crate::signal::Signal;

pub use intent::{PanSample, Point, TransitionIntent};
pub use reducer::{commands_between, dismiss_progress, TransitionCommand, TransitionReducer};
pub use state::TransitionPhase;

#[derive(Clone)]
pub struct TransitionOutputs {
    pub dismiss_view_controller: Signal<()>,
    pub update_interactive_transition: Signal<f64>,
    pub cancel_interactive_transition: Signal<()>,
    pub finish_interactive_transition: Signal<()>,
    /// Whether the interactive animator is driving the dismissal. Emitted on
    /// change only.
    pub set_transition_animator_is_in_flight: Signal<bool>,
}

impl TransitionOutputs {
    fn new() -> Self {
        Self {
            dismiss_view_controller: Signal::new(),
            update_interactive_transition: Signal::new(),
            cancel_interactive_transition: Signal::new(),
            finish_interactive_transition: Signal::new(),
            set_transition_animator_is_in_flight: Signal::new(),
        }
    }
}

struct EngineState {
    phase: TransitionPhase,
    /// Last value sent on `set_transition_animator_is_in_flight`.
    in_flight: Option<bool>,
}

pub struct TransitionEngine {
    dismiss_distance: f64,
    state: Mutex<EngineState>,
    outputs: TransitionOutputs,
}

impl TransitionEngine {
    pub fn new(dismiss_distance: f64) -> Self {
        Self {
            dismiss_distance,
            state: Mutex::new(EngineState {
                phase: TransitionPhase::Idle,
                in_flight: None,
            }),
            outputs: TransitionOutputs::new(),
        }
    }

    pub fn outputs(&self) -> &TransitionOutputs {
        &self.outputs
    }

    pub fn phase(&self) -> TransitionPhase {
        self.state.lock().phase
    }

    /// Feed one gesture sample. All resulting outputs are emitted before
    /// this returns.
    pub fn pan(&self, sample: PanSample) {
        let (from, to, in_flight_changed) = {
            let mut state = self.state.lock();
            let from = state.phase;
            let to = TransitionReducer::reduce(
                from,
                TransitionIntent::Pan {
                    sample,
                    dismiss_distance: self.dismiss_distance,
                },
            );
            state.phase = to;

            let in_flight = to.is_armed();
            let changed = state.in_flight != Some(in_flight);
            state.in_flight = Some(in_flight);
            (from, to, changed.then_some(in_flight))
        };

        if from != to {
            tracing::trace!(?from, ?to, "transition phase changed");
        }

        // The animator is flagged before a dismissal starts and cleared
        // after it resolves.
        if in_flight_changed == Some(true) {
            self.outputs.set_transition_animator_is_in_flight.emit(true);
        }

        for command in commands_between(&from, &to) {
            match command {
                TransitionCommand::Dismiss => {
                    tracing::debug!("interactive dismiss started");
                    self.outputs.dismiss_view_controller.emit(());
                }
                TransitionCommand::Update(progress) => {
                    self.outputs.update_interactive_transition.emit(progress);
                }
                TransitionCommand::Cancel => {
                    tracing::debug!("interactive dismiss cancelled");
                    self.outputs.cancel_interactive_transition.emit(());
                }
                TransitionCommand::Finish => {
                    tracing::info!("interactive dismiss finished");
                    self.outputs.finish_interactive_transition.emit(());
                }
            }
        }

        if in_flight_changed == Some(false) {
            self.outputs.set_transition_animator_is_in_flight.emit(false);
        }
    }
}
