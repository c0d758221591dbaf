//! Base trait for intents in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - Presentation inputs (pan samples, swipe callbacks)
/// - Collaborator results (page arrivals, fetch failures)
pub trait Intent: Send + 'static {}
