use thiserror::Error;

/// A failure the user gets to see.
///
/// Each variant carries the exact text shown and maps to where it is shown:
/// the page banner, inline at the upload control, or an alert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortalError {
    /// The backend could not be reached or did not answer properly.
    #[error("{0}")]
    Network(String),

    /// A file was rejected, locally or by the backend.
    #[error("{0}")]
    Validation(String),

    /// A download or delete failed.
    #[error("{0}")]
    Action(String),

    /// An upload is already running.
    #[error("An upload is already in progress")]
    Busy,
}

impl PortalError {
    pub fn message(&self) -> String {
        self.to_string()
    }
}
