//! Cursor-based incremental list loading.
//!
//! [`PaginationEngine`] owns the accumulated items, the continuation cursor
//! and the loading flag. State changes go through [`PaginationReducer`];
//! fetches go through a [`PageSource`].

mod engine;
mod state;

pub use engine::{PageSource, PaginationEngine, PaginationOptions, PaginationOutputs};
pub use state::{Page, PaginationIntent, PaginationReducer, PaginationState};
