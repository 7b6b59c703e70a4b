use thiserror::Error;

/// Generic banner text when the server gives no reason of its own.
pub const GENERIC_FAILURE: &str = "Classification failed";

/// Everything that can end an acquisition or classification attempt.
///
/// The `Display` text is exactly what the error banner shows. None of these
/// are fatal: the user can pick another file or press Classify again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("Please select a valid image file")]
    InvalidType,
    #[error("File size must be less than 10MB")]
    TooLarge,
    /// No usable response arrived. The payload is diagnostic detail for logs;
    /// the banner text stays fixed.
    #[error("Unable to connect to server. Make sure the backend service is running.")]
    TransportFailure(String),
    #[error("{0}")]
    ServerError(String),
    /// The chosen file could not be inspected. Detail is for logs only.
    #[error("Unable to read the selected file")]
    Unreadable(String),
}

impl ClassifyError {
    /// Server-side failure, falling back to the generic text when the server
    /// did not say what went wrong.
    pub fn server(message: Option<String>) -> Self {
        match message {
            Some(msg) if !msg.is_empty() => ClassifyError::ServerError(msg),
            _ => ClassifyError::ServerError(GENERIC_FAILURE.to_string()),
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        ClassifyError::TransportFailure(detail.into())
    }
}
