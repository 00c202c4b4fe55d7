//! Connection reconciler error types.

use shared_types::PairId;
use sm_01_document_store::StoreError;
use thiserror::Error;

/// Connection reconciler error taxonomy.
///
/// Precondition violations are detected locally and fail fast without any
/// network write; `Store` wraps transport failures from the document store.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Sender and recipient are the same identity.
    #[error("Cannot send a connection request to yourself")]
    SelfConnection,

    /// An identity string was empty.
    #[error("Identity must be a non-empty string")]
    EmptyIdentity,

    /// A request between the pair is already pending, or a rejected request
    /// can only be re-opened by its original sender.
    #[error("Connection request already exists for pair {0}")]
    DuplicateRequest(PairId),

    /// The pair is already connected.
    #[error("Users are already connected for pair {0}")]
    AlreadyConnected(PairId),

    /// The responder is not the recipient of the request.
    #[error("Not authorized to respond to request {0}")]
    NotAuthorized(PairId),

    /// No request exists at the given id (or it is no longer respondable).
    #[error("Connection request not found: {0}")]
    NotFound(PairId),

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
