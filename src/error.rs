use thiserror::Error;

use crate::backend::BackendError;

/// Client-side validation failures on the admin form.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be a whole number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Expected arrival must be a date (YYYY-MM-DD), got {0:?}")]
    InvalidDate(String),
    #[error("Unknown customer: {0}")]
    InvalidCustomer(String),
    #[error("Order code cannot be changed on an existing order")]
    IdentifierLocked,
}

/// Errors surfaced by board operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BoardError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("Admin session required")]
    NotAuthorized,
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("The order form is not open")]
    FormClosed,
    #[error("No delete is waiting for confirmation")]
    NoPendingDelete,
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
