//! Pure transition rules for the connection state machine.
//!
//! Separated from the store-backed adapter so the rules are testable without
//! I/O. The adapter reads the current record, asks these functions what to
//! do, then performs the write.

use shared_types::{ConnectionRequest, ConnectionStatus, PairId, UserId};

use super::errors::ConnectionError;
use super::invariants::invariant_valid_pair;
use super::value_objects::Decision;

/// What a `request_connection` call should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestAction {
    /// No record exists for the pair: create a fresh pending request.
    Create,
    /// A rejected record exists and the caller is its original sender:
    /// reset it to pending in place.
    Reopen,
}

/// What a `respond_to_connection` call should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseAction {
    /// Pending request transitions into the decided state now.
    Apply,
    /// The request is already in the decided state; nothing to write and no
    /// side effects to re-emit.
    NoOp,
}

/// Decide how a connection request applies against the current record.
///
/// # Errors
/// - `SelfConnection` / `EmptyIdentity` - invalid identities
/// - `DuplicateRequest` - pending already, or rejected and the caller is not
///   the original sender (the other party must be the one to re-initiate)
/// - `AlreadyConnected` - the pair is already accepted
pub fn evaluate_request(
    existing: Option<&ConnectionRequest>,
    sender_id: &UserId,
    recipient_id: &UserId,
) -> Result<RequestAction, ConnectionError> {
    invariant_valid_pair(sender_id, recipient_id)?;

    let Some(record) = existing else {
        return Ok(RequestAction::Create);
    };

    match record.status {
        ConnectionStatus::Pending => Err(ConnectionError::DuplicateRequest(record.id.clone())),
        ConnectionStatus::Accepted => Err(ConnectionError::AlreadyConnected(record.id.clone())),
        ConnectionStatus::Rejected if record.sender_id == *sender_id => Ok(RequestAction::Reopen),
        ConnectionStatus::Rejected => Err(ConnectionError::DuplicateRequest(record.id.clone())),
    }
}

/// Decide how a response applies against the current record.
///
/// # Errors
/// - `NotAuthorized` - responder is not the recipient on record
/// - `AlreadyConnected` - rejecting an already-accepted connection
/// - `NotFound` - accepting a rejected request (the pending request no
///   longer exists; the original sender must re-open first)
pub fn evaluate_response(
    record: &ConnectionRequest,
    responder_id: &UserId,
    decision: Decision,
) -> Result<ResponseAction, ConnectionError> {
    if record.recipient_id != *responder_id {
        return Err(ConnectionError::NotAuthorized(record.id.clone()));
    }

    match (record.status, decision) {
        (ConnectionStatus::Pending, _) => Ok(ResponseAction::Apply),
        (ConnectionStatus::Accepted, Decision::Accepted) => Ok(ResponseAction::NoOp),
        (ConnectionStatus::Accepted, Decision::Rejected) => {
            Err(ConnectionError::AlreadyConnected(record.id.clone()))
        }
        (ConnectionStatus::Rejected, Decision::Rejected) => Ok(ResponseAction::NoOp),
        (ConnectionStatus::Rejected, Decision::Accepted) => {
            Err(ConnectionError::NotFound(record.id.clone()))
        }
    }
}

/// Canonical id a request between two users lives at.
#[must_use]
pub fn request_address(a: &UserId, b: &UserId) -> PairId {
    PairId::of(a, b)
}
