//! Inbound port: the reconciler API the UI layer calls.

use async_trait::async_trait;
use shared_types::{ConnectionRequest, PairId, UserId};
use sm_01_document_store::ChangeSubscription;

use crate::domain::{ConnectionError, Decision, RequestContext};

/// Primary API of the connection subsystem.
///
/// These four operations (plus the notification subscription on the relay)
/// are the only calls a UI component is expected to make; rendering, forms
/// and toasts live outside.
#[async_trait]
pub trait ConnectionApi: Send + Sync {
    /// Request (or re-open) a connection from `sender_id` to `recipient_id`.
    ///
    /// Returns the canonical pair id the request lives at. The recipient
    /// notification is best-effort; its failure does not fail this call.
    ///
    /// # Errors
    /// - `SelfConnection` / `EmptyIdentity` - invalid identities
    /// - `DuplicateRequest` - already pending, or a rejected request the
    ///   caller did not originally send
    /// - `AlreadyConnected` - the pair is already accepted
    /// - `Store` - the primary write failed
    async fn request_connection(
        &self,
        sender_id: &UserId,
        recipient_id: &UserId,
        context: RequestContext,
    ) -> Result<PairId, ConnectionError>;

    /// Accept or reject a pending request.
    ///
    /// Only the recipient on record may respond. Acceptance idempotently
    /// creates the friend record, bootstraps the conversation, and notifies
    /// the original sender; rejection only notifies.
    ///
    /// # Errors
    /// - `NotFound` - no request at this id, or it is no longer respondable
    /// - `NotAuthorized` - responder is not the recipient
    /// - `AlreadyConnected` - rejecting an accepted connection
    /// - `Store` - the primary write failed
    async fn respond_to_connection(
        &self,
        request_id: &PairId,
        responder_id: &UserId,
        decision: Decision,
    ) -> Result<(), ConnectionError>;

    /// Fetch the request between a pair, if any.
    async fn get_request(
        &self,
        request_id: &PairId,
    ) -> Result<Option<ConnectionRequest>, ConnectionError>;

    /// True iff a friend record exists for the pair.
    async fn are_friends(&self, a: &UserId, b: &UserId) -> Result<bool, ConnectionError>;

    /// Change-feed subscription for pending requests addressed to a user.
    fn subscribe_to_incoming_requests(&self, recipient_id: &UserId) -> ChangeSubscription;
}
