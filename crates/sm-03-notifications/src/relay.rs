//! Store-backed notification relay.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_types::{
    collections, Notification, NotificationKind, PairId, TimeSource, UserId,
};
use sm_01_document_store::{
    fields_of, ChangeSubscription, DocumentStore, Fields, Filter, Ordering, Query,
};

use crate::error::RelayError;
use crate::ports::{EmailSink, OutboundEmail, ProfileDirectory};

/// A notification about to be fanned out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewNotification {
    /// Who it is for.
    pub recipient_id: UserId,
    /// Who triggered it.
    pub sender_id: UserId,
    /// What happened.
    pub kind: NotificationKind,
    /// Custom text; when `None` the relay composes a default from the kind
    /// and the sender's display name.
    pub message: Option<String>,
    /// Connection request back-reference, if any.
    pub request_id: Option<PairId>,
    /// Session back-reference, if any.
    pub session_id: Option<String>,
}

/// Inbound port of the relay.
#[async_trait]
pub trait NotificationsApi: Send + Sync {
    /// Write one notification record; returns its document id.
    ///
    /// Push delivery to listening clients is the store's subscription
    /// mechanism, not the relay's concern.
    async fn notify(&self, note: NewNotification) -> Result<String, RelayError>;

    /// Mark a notification read. Only its recipient may do this.
    async fn mark_read(
        &self,
        recipient_id: &UserId,
        notification_id: &str,
    ) -> Result<(), RelayError>;

    /// Unread notifications for a recipient, newest first.
    async fn unread(&self, recipient_id: &UserId) -> Result<Vec<Notification>, RelayError>;

    /// Change-feed subscription scoped to one recipient.
    fn subscribe_to_notifications(&self, recipient_id: &UserId) -> ChangeSubscription;
}

/// The notification relay.
pub struct NotificationRelay {
    store: Arc<dyn DocumentStore>,
    profiles: Arc<dyn ProfileDirectory>,
    mailer: Option<Arc<dyn EmailSink>>,
    time: Arc<dyn TimeSource>,
}

impl NotificationRelay {
    /// Build a relay without email fan-out.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        profiles: Arc<dyn ProfileDirectory>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            store,
            profiles,
            mailer: None,
            time,
        }
    }

    /// Attach an email sink; delivery stays best-effort.
    #[must_use]
    pub fn with_mailer(mut self, mailer: Arc<dyn EmailSink>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Natural key: one notification per request (or session) per
    /// transition kind; anything else gets a generated id.
    fn document_id(note: &NewNotification) -> String {
        if let Some(request_id) = &note.request_id {
            format!("{}:{}", request_id, note.kind.as_str())
        } else if let Some(session_id) = &note.session_id {
            format!("{}:{}", session_id, note.kind.as_str())
        } else {
            Uuid::new_v4().to_string()
        }
    }

    fn default_message(kind: NotificationKind, sender_name: &str) -> String {
        match kind {
            NotificationKind::ConnectionRequested => {
                format!("{sender_name} wants to connect with you")
            }
            NotificationKind::ConnectionAccepted => {
                format!("{sender_name} accepted your connection request")
            }
            NotificationKind::ConnectionRejected => {
                format!("{sender_name} declined your connection request")
            }
            NotificationKind::MessageReceived => format!("New message from {sender_name}"),
            NotificationKind::SessionScheduled => {
                format!("{sender_name} scheduled a session with you")
            }
            NotificationKind::SessionCancelled => {
                format!("{sender_name} cancelled your session")
            }
        }
    }

    fn subject_line(kind: NotificationKind) -> &'static str {
        match kind {
            NotificationKind::ConnectionRequested => "New connection request",
            NotificationKind::ConnectionAccepted => "Connection accepted",
            NotificationKind::ConnectionRejected => "Connection declined",
            NotificationKind::MessageReceived => "New message",
            NotificationKind::SessionScheduled => "Session scheduled",
            NotificationKind::SessionCancelled => "Session cancelled",
        }
    }
}

#[async_trait]
impl NotificationsApi for NotificationRelay {
    async fn notify(&self, note: NewNotification) -> Result<String, RelayError> {
        let id = Self::document_id(&note);
        let sender_name = self
            .profiles
            .display_name(&note.sender_id)
            .await
            .unwrap_or_else(|| note.sender_id.clone());
        let message = note
            .message
            .clone()
            .unwrap_or_else(|| Self::default_message(note.kind, &sender_name));

        let record = Notification {
            id: id.clone(),
            recipient_id: note.recipient_id.clone(),
            sender_id: note.sender_id.clone(),
            kind: note.kind,
            message: message.clone(),
            read: false,
            request_id: note.request_id.clone(),
            session_id: note.session_id.clone(),
            created_at: self.time.now(),
        };
        self.store
            .set(collections::NOTIFICATIONS, &id, fields_of(&record)?)
            .await?;
        info!(
            id = %id,
            recipient = %note.recipient_id,
            kind = note.kind.as_str(),
            "[sm-03] Notification written"
        );

        if let Some(mailer) = &self.mailer {
            let email = OutboundEmail {
                to: note.recipient_id.clone(),
                subject: Self::subject_line(note.kind).to_string(),
                body: message,
            };
            if let Err(e) = mailer.send(email).await {
                warn!(recipient = %note.recipient_id, error = %e, "[sm-03] Email fan-out failed; notification already written");
            }
        }

        Ok(id)
    }

    async fn mark_read(
        &self,
        recipient_id: &UserId,
        notification_id: &str,
    ) -> Result<(), RelayError> {
        let doc = self
            .store
            .get(collections::NOTIFICATIONS, notification_id)
            .await?
            .ok_or_else(|| RelayError::NotFound(notification_id.to_string()))?;
        let record: Notification = doc.decode()?;

        if record.recipient_id != *recipient_id {
            return Err(RelayError::NotAuthorized(notification_id.to_string()));
        }

        let mut partial = Fields::new();
        partial.insert("read".into(), Value::Bool(true));
        self.store
            .update(collections::NOTIFICATIONS, notification_id, partial)
            .await?;
        debug!(id = notification_id, "[sm-03] Notification marked read");
        Ok(())
    }

    async fn unread(&self, recipient_id: &UserId) -> Result<Vec<Notification>, RelayError> {
        let docs = self
            .store
            .query(
                collections::NOTIFICATIONS,
                &[
                    Filter::eq("recipient_id", recipient_id.clone()),
                    Filter::eq("read", false),
                ],
                Some(&Ordering::descending("created_at")),
            )
            .await?;
        docs.iter()
            .map(|d| d.decode::<Notification>().map_err(RelayError::from))
            .collect()
    }

    fn subscribe_to_notifications(&self, recipient_id: &UserId) -> ChangeSubscription {
        self.store.subscribe(
            Query::collection(collections::NOTIFICATIONS)
                .with_filter(Filter::eq("recipient_id", recipient_id.clone())),
        )
    }
}
