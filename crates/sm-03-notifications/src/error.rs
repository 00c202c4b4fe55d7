//! Relay error types.

use sm_01_document_store::StoreError;
use thiserror::Error;

/// Notification relay errors.
#[derive(Debug, Error)]
pub enum RelayError {
    /// No notification at the given id.
    #[error("Notification not found: {0}")]
    NotFound(String),

    /// The caller does not own the notification.
    #[error("Not authorized to mutate notification {0}")]
    NotAuthorized(String),

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
