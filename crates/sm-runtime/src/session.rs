//! Caller-scoped facade over the container.

use std::sync::Arc;

use shared_types::{
    ConnectionRequest, Message, Notification, PairId, Session, Timestamp, UserId,
};
use sm_01_document_store::ChangeSubscription;
use sm_02_connections::{ConnectionApi, ConnectionError, Decision, RequestContext};
use sm_03_notifications::{NotificationsApi, RelayError};
use sm_04_messaging::{MessagingApi, MessagingError};
use sm_05_sessions::{SessionsApi, SessionsError};

use crate::container::MeshContainer;

/// One authenticated user's view of the mesh.
///
/// Every operation runs as the bound user; subsystem-level authorization
/// (recipient-only responses, participant-only messaging and cancellation)
/// still applies underneath. The facade adds no policy of its own.
pub struct MeshSession {
    user: UserId,
    mesh: Arc<MeshContainer>,
}

impl MeshSession {
    pub(crate) fn new(user: UserId, mesh: Arc<MeshContainer>) -> Self {
        Self { user, mesh }
    }

    /// The user this session acts as.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user
    }

    /// Request (or re-open) a connection to another user.
    pub async fn request_connection(
        &self,
        recipient_id: &UserId,
        context: RequestContext,
    ) -> Result<PairId, ConnectionError> {
        self.mesh
            .connections
            .request_connection(&self.user, recipient_id, context)
            .await
    }

    /// Accept or reject a pending request addressed to this user.
    pub async fn respond(
        &self,
        request_id: &PairId,
        decision: Decision,
    ) -> Result<(), ConnectionError> {
        self.mesh
            .connections
            .respond_to_connection(request_id, &self.user, decision)
            .await
    }

    /// The request between this user and another, if any.
    pub async fn request_with(
        &self,
        other: &UserId,
    ) -> Result<Option<ConnectionRequest>, ConnectionError> {
        self.mesh
            .connections
            .get_request(&PairId::of(&self.user, other))
            .await
    }

    /// True iff this user is connected to `other`.
    pub async fn is_connected_to(&self, other: &UserId) -> Result<bool, ConnectionError> {
        self.mesh.connections.are_friends(&self.user, other).await
    }

    /// Live feed of pending requests addressed to this user.
    #[must_use]
    pub fn incoming_requests(&self) -> ChangeSubscription {
        self.mesh
            .connections
            .subscribe_to_incoming_requests(&self.user)
    }

    /// Send a message to a connected user. The conversation id is the
    /// canonical pair id, so no lookup is needed to address it.
    pub async fn send_message_to(
        &self,
        other: &UserId,
        body: &str,
    ) -> Result<Message, MessagingError> {
        self.mesh
            .messaging
            .send_message(&PairId::of(&self.user, other), &self.user, body)
            .await
    }

    /// Conversation history with another user, oldest first.
    pub async fn messages_with(&self, other: &UserId) -> Result<Vec<Message>, MessagingError> {
        self.mesh
            .messaging
            .list_messages(&PairId::of(&self.user, other))
            .await
    }

    /// Live feed of the conversation with another user.
    #[must_use]
    pub fn conversation_feed(&self, other: &UserId) -> ChangeSubscription {
        self.mesh
            .messaging
            .subscribe_to_messages(&PairId::of(&self.user, other))
    }

    /// Schedule a session this user hosts.
    pub async fn schedule_session(
        &self,
        guest_id: &UserId,
        skill_name: &str,
        scheduled_at: Timestamp,
    ) -> Result<Session, SessionsError> {
        self.mesh
            .sessions
            .schedule_session(&self.user, guest_id, skill_name, scheduled_at)
            .await
    }

    /// Cancel a session this user participates in.
    pub async fn cancel_session(&self, session_id: &str) -> Result<(), SessionsError> {
        self.mesh
            .sessions
            .cancel_session(session_id, &self.user)
            .await
    }

    /// Sessions this user hosts or attends, soonest first.
    pub async fn my_sessions(&self) -> Result<Vec<Session>, SessionsError> {
        self.mesh.sessions.sessions_for(&self.user).await
    }

    /// Unread notifications, newest first.
    pub async fn unread_notifications(&self) -> Result<Vec<Notification>, RelayError> {
        self.mesh.notifications.unread(&self.user).await
    }

    /// Mark one of this user's notifications read.
    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<(), RelayError> {
        self.mesh
            .notifications
            .mark_read(&self.user, notification_id)
            .await
    }

    /// Live feed of this user's notifications.
    #[must_use]
    pub fn notification_feed(&self) -> ChangeSubscription {
        self.mesh.notifications.subscribe_to_notifications(&self.user)
    }
}
