//! Notification adapters: outbound ports of sm-02/04/05 over the relay.

use std::sync::Arc;

use async_trait::async_trait;

use shared_types::{NotificationKind, PairId, Session, UserId};
use sm_02_connections::{ConnectionNotice, NotificationSink, SinkError};
use sm_03_notifications::{NewNotification, NotificationsApi};
use sm_04_messaging::{MessageNotifier, NotifyError as MessageNotifyError};
use sm_05_sessions::{NotifyError as SessionNotifyError, SessionNotifier};

/// [`NotificationSink`] of the connection reconciler, backed by the relay.
///
/// The notice text is left to the relay, which composes it from the kind
/// and the sender's display name. Skill context stays on the request
/// record the notification references.
pub struct RelayNotificationSink {
    relay: Arc<dyn NotificationsApi>,
}

impl RelayNotificationSink {
    /// Build a sink over the relay.
    pub fn new(relay: Arc<dyn NotificationsApi>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl NotificationSink for RelayNotificationSink {
    async fn deliver(&self, notice: ConnectionNotice) -> Result<(), SinkError> {
        self.relay
            .notify(NewNotification {
                recipient_id: notice.recipient_id,
                sender_id: notice.sender_id,
                kind: notice.kind,
                message: None,
                request_id: Some(notice.request_id),
                session_id: None,
            })
            .await
            .map(|_| ())
            .map_err(|e| SinkError(e.to_string()))
    }
}

/// [`MessageNotifier`] of the messaging service, backed by the relay.
///
/// Message notifications carry no back-reference, so each one gets a
/// generated id; every message produces its own unread entry.
pub struct RelayMessageNotifier {
    relay: Arc<dyn NotificationsApi>,
}

impl RelayMessageNotifier {
    /// Build a notifier over the relay.
    pub fn new(relay: Arc<dyn NotificationsApi>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl MessageNotifier for RelayMessageNotifier {
    async fn message_received(
        &self,
        recipient_id: &UserId,
        sender_id: &UserId,
        _conversation_id: &PairId,
    ) -> Result<(), MessageNotifyError> {
        self.relay
            .notify(NewNotification {
                recipient_id: recipient_id.clone(),
                sender_id: sender_id.clone(),
                kind: NotificationKind::MessageReceived,
                message: None,
                request_id: None,
                session_id: None,
            })
            .await
            .map(|_| ())
            .map_err(|e| MessageNotifyError(e.to_string()))
    }
}

/// [`SessionNotifier`] of the sessions service, backed by the relay.
pub struct RelaySessionNotifier {
    relay: Arc<dyn NotificationsApi>,
}

impl RelaySessionNotifier {
    /// Build a notifier over the relay.
    pub fn new(relay: Arc<dyn NotificationsApi>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl SessionNotifier for RelaySessionNotifier {
    async fn session_scheduled(&self, session: &Session) -> Result<(), SessionNotifyError> {
        self.relay
            .notify(NewNotification {
                recipient_id: session.guest_id.clone(),
                sender_id: session.host_id.clone(),
                kind: NotificationKind::SessionScheduled,
                message: Some(format!(
                    "New {} session scheduled; join at {}",
                    session.skill_name, session.meeting_link
                )),
                request_id: None,
                session_id: Some(session.id.clone()),
            })
            .await
            .map(|_| ())
            .map_err(|e| SessionNotifyError(e.to_string()))
    }

    async fn session_cancelled(
        &self,
        session: &Session,
        cancelled_by: &UserId,
    ) -> Result<(), SessionNotifyError> {
        let recipient = if cancelled_by == &session.host_id {
            session.guest_id.clone()
        } else {
            session.host_id.clone()
        };
        self.relay
            .notify(NewNotification {
                recipient_id: recipient,
                sender_id: cancelled_by.clone(),
                kind: NotificationKind::SessionCancelled,
                message: Some(format!("Your {} session was cancelled", session.skill_name)),
                request_id: None,
                session_id: Some(session.id.clone()),
            })
            .await
            .map(|_| ())
            .map_err(|e| SessionNotifyError(e.to_string()))
    }
}
