//! Messaging error types.

use shared_types::PairId;
use sm_01_document_store::StoreError;
use thiserror::Error;

/// Messaging errors.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// No conversation exists at the given id.
    #[error("Conversation not found: {0}")]
    ConversationNotFound(PairId),

    /// The sender is not a participant of the conversation.
    #[error("Not a participant of conversation {0}")]
    NotAuthorized(PairId),

    /// Empty message body.
    #[error("Message body must be non-empty")]
    EmptyBody,

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
