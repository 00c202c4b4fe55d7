//! Session scheduling error types.

use sm_01_document_store::StoreError;
use thiserror::Error;

/// Session scheduling errors.
#[derive(Debug, Error)]
pub enum SessionsError {
    /// Host and guest are the same user.
    #[error("A session needs two distinct participants")]
    SelfSession,

    /// The two users are not connected.
    #[error("Users are not connected; accept a connection request first")]
    NotConnected,

    /// No session exists at the given id.
    #[error("Session not found: {0}")]
    NotFound(String),

    /// The caller is not a participant of the session.
    #[error("Not a participant of session {0}")]
    NotAuthorized(String),

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
