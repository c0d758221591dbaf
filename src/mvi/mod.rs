//! Model-View-Intent primitives shared by every view model.
//!
//! ```text
//! input ──→ Intent ──→ Reducer ──→ State ──→ output signals
//! ```
//!
//! - **State**: snapshot owned by exactly one engine
//! - **Intent**: an input event, already decoded into domain terms
//! - **Reducer**: pure `(State, Intent) -> State`; engines diff the old and
//!   new state to decide what to emit

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
