use thiserror::Error;

/// Failure reported by a fetch collaborator.
///
/// View models never surface these on their item or user outputs; they are
/// logged and forwarded to diagnostic signals only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid pagination cursor '{0}'")]
    InvalidCursor(String),

    #[error("no authenticated user")]
    Unauthenticated,
}

impl FetchError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }
}

/// Errors raised while building a view model.
#[derive(Debug, Error)]
pub enum ViewModelError {
    /// Fetching view models spawn their requests on the ambient tokio runtime.
    #[error("view model must be created inside a tokio runtime")]
    NoRuntime(#[source] tokio::runtime::TryCurrentError),
}
