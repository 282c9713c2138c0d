//! Studio error types

use thiserror::Error;

/// Result type for studio operations
pub type StudioResult<T> = Result<T, StudioError>;

/// Studio error types
#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Gateway returned {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("Invalid session state: {message}")]
    InvalidState { message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StudioError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}
