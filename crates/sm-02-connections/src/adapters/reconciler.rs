//! Store-backed connection reconciler.
//!
//! Reads the current record at the canonical pair address, applies the
//! domain rules, writes the new state, then fires the paired side effects
//! (friend record, conversation bootstrap, notification) independently and
//! best-effort.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use shared_types::{
    collections, ConnectionRequest, Conversation, Friend, NotificationKind, PairId, Timestamp,
    UserId,
};
use sm_01_document_store::{
    fields_of, ChangeSubscription, DocumentStore, Fields, Filter, Query, StoreError,
};

use crate::domain::invariants::invariant_valid_pair;
use crate::domain::state::{evaluate_request, evaluate_response, request_address};
use crate::domain::{ConnectionError, Decision, RequestAction, RequestContext, ResponseAction};
use crate::ports::inbound::ConnectionApi;
use crate::ports::outbound::{ConnectionNotice, NotificationSink, TimeSource};

/// The connection reconciler.
///
/// Dependencies are injected by the composition root; the reconciler holds
/// no global state of its own.
pub struct ConnectionReconciler {
    store: Arc<dyn DocumentStore>,
    notifications: Arc<dyn NotificationSink>,
    time: Arc<dyn TimeSource>,
}

impl ConnectionReconciler {
    /// Build a reconciler over a store handle, a notification sink and a
    /// time source.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        notifications: Arc<dyn NotificationSink>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            store,
            notifications,
            time,
        }
    }

    async fn read_request(
        &self,
        id: &PairId,
    ) -> Result<Option<ConnectionRequest>, ConnectionError> {
        let doc = self
            .store
            .get(collections::CONNECTION_REQUESTS, id.as_str())
            .await?;
        doc.map(|d| d.decode::<ConnectionRequest>())
            .transpose()
            .map_err(ConnectionError::from)
    }

    /// Fire-and-log notification delivery. The primary write has already
    /// succeeded; a failed notification never unwinds it.
    async fn emit(&self, notice: ConnectionNotice) {
        let kind = notice.kind;
        let recipient = notice.recipient_id.clone();
        if let Err(e) = self.notifications.deliver(notice).await {
            warn!(
                kind = kind.as_str(),
                recipient = %recipient,
                error = %e,
                "[sm-02] Notification delivery failed; connection state remains authoritative"
            );
        }
    }

    /// Create the friend record for the pair if one does not already exist.
    ///
    /// Check-then-write: a concurrent acceptor could double-write here since
    /// the store offers no cross-document transaction. The canonical pair id
    /// makes the second write land on the same address, so the race degrades
    /// to a harmless overwrite.
    async fn ensure_friend(
        &self,
        record: &ConnectionRequest,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        if self
            .store
            .get(collections::FRIENDS, record.id.as_str())
            .await?
            .is_some()
        {
            debug!(pair = %record.id, "[sm-02] Friend record already present");
            return Ok(());
        }

        let friend = Friend::between(
            &record.sender_id,
            &record.recipient_id,
            record.id.clone(),
            now,
        );
        self.store
            .set(collections::FRIENDS, record.id.as_str(), fields_of(&friend)?)
            .await
    }

    /// Lazily bootstrap the conversation document for the pair.
    async fn ensure_conversation(
        &self,
        record: &ConnectionRequest,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        if self
            .store
            .get(collections::CONVERSATIONS, record.id.as_str())
            .await?
            .is_some()
        {
            return Ok(());
        }

        let conversation = Conversation::between(&record.sender_id, &record.recipient_id, now);
        self.store
            .set(
                collections::CONVERSATIONS,
                record.id.as_str(),
                fields_of(&conversation)?,
            )
            .await
    }
}

#[async_trait]
impl ConnectionApi for ConnectionReconciler {
    async fn request_connection(
        &self,
        sender_id: &UserId,
        recipient_id: &UserId,
        context: RequestContext,
    ) -> Result<PairId, ConnectionError> {
        // Identity invariants are purely local; they must fail before any
        // store round trip so an outage cannot mask them.
        invariant_valid_pair(sender_id, recipient_id)?;

        let pair = request_address(sender_id, recipient_id);
        let existing = self.read_request(&pair).await?;
        let action = evaluate_request(existing.as_ref(), sender_id, recipient_id)?;
        let now = self.time.now();

        let skill_name = match action {
            RequestAction::Create => {
                let record = ConnectionRequest::pending(
                    sender_id.clone(),
                    recipient_id.clone(),
                    context.skill_name,
                    context.message,
                    now,
                );
                self.store
                    .set(
                        collections::CONNECTION_REQUESTS,
                        pair.as_str(),
                        fields_of(&record)?,
                    )
                    .await?;
                info!(pair = %pair, sender = %sender_id, "[sm-02] Connection requested");
                record.skill_name
            }
            RequestAction::Reopen => {
                // evaluate_request only yields Reopen when a record exists
                let record = existing.ok_or_else(|| ConnectionError::NotFound(pair.clone()))?;

                let mut partial = Fields::new();
                partial.insert("status".into(), Value::String("pending".into()));
                partial.insert("updated_at".into(), Value::from(now));
                // New context replaces stored free text; identities on the
                // record are never touched.
                if let Some(skill) = &context.skill_name {
                    partial.insert("skill_name".into(), Value::String(skill.clone()));
                }
                if let Some(message) = &context.message {
                    partial.insert("message".into(), Value::String(message.clone()));
                }
                self.store
                    .update(collections::CONNECTION_REQUESTS, pair.as_str(), partial)
                    .await?;
                info!(pair = %pair, sender = %sender_id, "[sm-02] Rejected request re-opened");
                context.skill_name.or(record.skill_name)
            }
        };

        self.emit(ConnectionNotice {
            recipient_id: recipient_id.clone(),
            sender_id: sender_id.clone(),
            kind: NotificationKind::ConnectionRequested,
            request_id: pair.clone(),
            skill_name,
        })
        .await;

        Ok(pair)
    }

    async fn respond_to_connection(
        &self,
        request_id: &PairId,
        responder_id: &UserId,
        decision: Decision,
    ) -> Result<(), ConnectionError> {
        let record = self
            .read_request(request_id)
            .await?
            .ok_or_else(|| ConnectionError::NotFound(request_id.clone()))?;

        match evaluate_response(&record, responder_id, decision)? {
            ResponseAction::NoOp => {
                debug!(pair = %request_id, ?decision, "[sm-02] Response is a no-op");
                return Ok(());
            }
            ResponseAction::Apply => {}
        }

        let now = self.time.now();
        let mut partial = Fields::new();
        partial.insert(
            "status".into(),
            serde_json::to_value(decision.status()).map_err(StoreError::from)?,
        );
        partial.insert("updated_at".into(), Value::from(now));
        self.store
            .update(collections::CONNECTION_REQUESTS, request_id.as_str(), partial)
            .await?;
        info!(pair = %request_id, ?decision, "[sm-02] Connection request decided");

        let response_kind = match decision {
            Decision::Accepted => {
                if let Err(e) = self.ensure_friend(&record, now).await {
                    warn!(pair = %request_id, error = %e, "[sm-02] Friend record write failed after acceptance");
                }
                if let Err(e) = self.ensure_conversation(&record, now).await {
                    warn!(pair = %request_id, error = %e, "[sm-02] Conversation bootstrap failed after acceptance");
                }
                NotificationKind::ConnectionAccepted
            }
            Decision::Rejected => NotificationKind::ConnectionRejected,
        };

        self.emit(ConnectionNotice {
            recipient_id: record.sender_id.clone(),
            sender_id: record.recipient_id.clone(),
            kind: response_kind,
            request_id: request_id.clone(),
            skill_name: record.skill_name.clone(),
        })
        .await;

        Ok(())
    }

    async fn get_request(
        &self,
        request_id: &PairId,
    ) -> Result<Option<ConnectionRequest>, ConnectionError> {
        self.read_request(request_id).await
    }

    async fn are_friends(&self, a: &UserId, b: &UserId) -> Result<bool, ConnectionError> {
        let pair = request_address(a, b);
        Ok(self
            .store
            .get(collections::FRIENDS, pair.as_str())
            .await?
            .is_some())
    }

    fn subscribe_to_incoming_requests(&self, recipient_id: &UserId) -> ChangeSubscription {
        self.store.subscribe(
            Query::collection(collections::CONNECTION_REQUESTS)
                .with_filter(Filter::eq("recipient_id", recipient_id.clone()))
                .with_filter(Filter::eq("status", "pending")),
        )
    }
}
