//! Precondition checks, as pure functions.
//!
//! All of these run before any network write; a violation fails the whole
//! operation with no partial state.

use shared_types::UserId;

use super::errors::ConnectionError;

/// INVARIANT-1: a user cannot connect to themselves.
pub fn invariant_not_self(a: &UserId, b: &UserId) -> Result<(), ConnectionError> {
    if a == b {
        return Err(ConnectionError::SelfConnection);
    }
    Ok(())
}

/// Identities are opaque but must be non-empty.
pub fn invariant_nonempty(id: &UserId) -> Result<(), ConnectionError> {
    if id.is_empty() {
        return Err(ConnectionError::EmptyIdentity);
    }
    Ok(())
}

/// Check both identities of a request.
pub fn invariant_valid_pair(sender: &UserId, recipient: &UserId) -> Result<(), ConnectionError> {
    invariant_nonempty(sender)?;
    invariant_nonempty(recipient)?;
    invariant_not_self(sender, recipient)
}
