//! Base trait for view-model state in MVI architecture.

/// Marker trait for state objects.
///
/// States are cloned to produce the next state and compared to detect which
/// outputs a transition must emit.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
