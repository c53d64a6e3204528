use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur when talking to the orders backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Invalid response from backend: {0}")]
    Decode(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Rejected by backend: {0}")]
    Rejected(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl BackendError {
    /// Message the backend itself supplied, suitable for showing to a user.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            BackendError::Auth(message) | BackendError::Status { message, .. } => {
                Some(message.as_str()).filter(|m| !m.trim().is_empty())
            }
            _ => None,
        }
    }
}

impl From<FrameworkError> for BackendError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => BackendError::NotFound(id),
            FrameworkError::Rejected(reason) => BackendError::Rejected(reason),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                BackendError::ActorCommunicationError(err.to_string())
            }
        }
    }
}
