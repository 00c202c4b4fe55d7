//! Store-backed messaging service.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use shared_types::{collections, Conversation, Message, PairId, TimeSource, UserId};
use sm_01_document_store::{
    fields_of, ChangeSubscription, DocumentStore, Filter, Ordering, Query,
};

use crate::error::MessagingError;

/// Delivery failure from the message notifier. Logged and swallowed.
#[derive(Debug, Error)]
#[error("Message notification failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound port: tells the other participant a message arrived.
///
/// Implemented over the notification relay by a runtime adapter.
#[async_trait]
pub trait MessageNotifier: Send + Sync {
    /// Best-effort notification of a received message.
    async fn message_received(
        &self,
        recipient_id: &UserId,
        sender_id: &UserId,
        conversation_id: &PairId,
    ) -> Result<(), NotifyError>;
}

/// Inbound port of the messaging subsystem.
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// Send a message into an existing conversation.
    ///
    /// # Errors
    /// - `ConversationNotFound` - no conversation at this id
    /// - `NotAuthorized` - sender is not a participant
    /// - `EmptyBody` - blank body
    /// - `Store` - the write failed
    async fn send_message(
        &self,
        conversation_id: &PairId,
        sender_id: &UserId,
        body: &str,
    ) -> Result<Message, MessagingError>;

    /// All messages of a conversation, oldest first.
    async fn list_messages(&self, conversation_id: &PairId)
        -> Result<Vec<Message>, MessagingError>;

    /// Change-feed subscription for one conversation.
    fn subscribe_to_messages(&self, conversation_id: &PairId) -> ChangeSubscription;
}

/// The messaging service.
pub struct MessagingService {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn MessageNotifier>,
    time: Arc<dyn TimeSource>,
}

impl MessagingService {
    /// Build a messaging service over injected dependencies.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn MessageNotifier>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            store,
            notifier,
            time,
        }
    }

    async fn read_conversation(
        &self,
        id: &PairId,
    ) -> Result<Conversation, MessagingError> {
        let doc = self
            .store
            .get(collections::CONVERSATIONS, id.as_str())
            .await?
            .ok_or_else(|| MessagingError::ConversationNotFound(id.clone()))?;
        doc.decode::<Conversation>().map_err(MessagingError::from)
    }
}

#[async_trait]
impl MessagingApi for MessagingService {
    async fn send_message(
        &self,
        conversation_id: &PairId,
        sender_id: &UserId,
        body: &str,
    ) -> Result<Message, MessagingError> {
        if body.trim().is_empty() {
            return Err(MessagingError::EmptyBody);
        }

        let conversation = self.read_conversation(conversation_id).await?;
        if !conversation.has_participant(sender_id) {
            return Err(MessagingError::NotAuthorized(conversation_id.clone()));
        }

        let message = Message {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.clone(),
            sender_id: sender_id.clone(),
            body: body.to_string(),
            sent_at: self.time.now(),
        };
        self.store
            .set(collections::MESSAGES, &message.id, fields_of(&message)?)
            .await?;
        info!(conversation = %conversation_id, sender = %sender_id, "[sm-04] Message sent");

        // The conversation has exactly two participants, so the recipient
        // is whoever the sender is not.
        if let Some(recipient) = conversation.other_participant(sender_id) {
            if let Err(e) = self
                .notifier
                .message_received(recipient, sender_id, conversation_id)
                .await
            {
                warn!(conversation = %conversation_id, error = %e, "[sm-04] Message notification failed; message already stored");
            }
        }

        Ok(message)
    }

    async fn list_messages(
        &self,
        conversation_id: &PairId,
    ) -> Result<Vec<Message>, MessagingError> {
        let docs = self
            .store
            .query(
                collections::MESSAGES,
                &[Filter::eq("conversation_id", conversation_id.as_str())],
                Some(&Ordering::ascending("sent_at")),
            )
            .await?;
        docs.iter()
            .map(|d| d.decode::<Message>().map_err(MessagingError::from))
            .collect()
    }

    fn subscribe_to_messages(&self, conversation_id: &PairId) -> ChangeSubscription {
        self.store.subscribe(
            Query::collection(collections::MESSAGES)
                .with_filter(Filter::eq("conversation_id", conversation_id.as_str())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Timestamp;
    use sm_01_document_store::InMemoryStore;
    use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
    use std::time::Duration;
    use tokio::time::timeout;

    struct SteppingClock(AtomicU64);

    impl TimeSource for SteppingClock {
        fn now(&self) -> Timestamp {
            1_000 + self.0.fetch_add(1_000, AtomicOrdering::SeqCst)
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        received: parking_lot::Mutex<Vec<(UserId, UserId)>>,
        failing: bool,
    }

    #[async_trait]
    impl MessageNotifier for RecordingNotifier {
        async fn message_received(
            &self,
            recipient_id: &UserId,
            sender_id: &UserId,
            _conversation_id: &PairId,
        ) -> Result<(), NotifyError> {
            if self.failing {
                return Err(NotifyError("relay down".into()));
            }
            self.received
                .lock()
                .push((recipient_id.clone(), sender_id.clone()));
            Ok(())
        }
    }

    async fn seed_conversation(store: &InMemoryStore) -> PairId {
        let a = "alice".to_string();
        let b = "bob".to_string();
        let conversation = Conversation::between(&a, &b, 1);
        store
            .set(
                collections::CONVERSATIONS,
                conversation.id.as_str(),
                fields_of(&conversation).unwrap(),
            )
            .await
            .unwrap();
        conversation.id
    }

    fn service(
        store: Arc<InMemoryStore>,
        notifier: Arc<RecordingNotifier>,
    ) -> MessagingService {
        MessagingService::new(store, notifier, Arc::new(SteppingClock(AtomicU64::new(0))))
    }

    #[tokio::test]
    async fn test_send_requires_participancy() {
        let store = Arc::new(InMemoryStore::new());
        let id = seed_conversation(&store).await;
        let svc = service(store, Arc::new(RecordingNotifier::default()));

        let err = svc
            .send_message(&id, &"mallory".to_string(), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, MessagingError::NotAuthorized(_)));

        let err = svc
            .send_message(&PairId::from_raw("x_y"), &"alice".to_string(), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, MessagingError::ConversationNotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_body_rejected_before_reads() {
        let store = Arc::new(InMemoryStore::new());
        let id = seed_conversation(&store).await;
        let svc = service(store.clone(), Arc::new(RecordingNotifier::default()));

        let err = svc
            .send_message(&id, &"alice".to_string(), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, MessagingError::EmptyBody));
        assert_eq!(store.count(collections::MESSAGES), 0);
    }

    #[tokio::test]
    async fn test_messages_listed_oldest_first_and_notify_other_side() {
        let store = Arc::new(InMemoryStore::new());
        let id = seed_conversation(&store).await;
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(store, notifier.clone());

        svc.send_message(&id, &"alice".to_string(), "first").await.unwrap();
        svc.send_message(&id, &"bob".to_string(), "second").await.unwrap();

        let messages = svc.list_messages(&id).await.unwrap();
        let bodies: Vec<_> = messages.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);

        let received = notifier.received.lock();
        assert_eq!(received[0], ("bob".to_string(), "alice".to_string()));
        assert_eq!(received[1], ("alice".to_string(), "bob".to_string()));
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_fail_send() {
        let store = Arc::new(InMemoryStore::new());
        let id = seed_conversation(&store).await;
        let svc = service(
            store.clone(),
            Arc::new(RecordingNotifier {
                failing: true,
                ..Default::default()
            }),
        );

        svc.send_message(&id, &"alice".to_string(), "hello").await.unwrap();
        assert_eq!(store.count(collections::MESSAGES), 1);
    }

    #[tokio::test]
    async fn test_conversation_subscription() {
        let store = Arc::new(InMemoryStore::new());
        let id = seed_conversation(&store).await;
        let svc = service(store, Arc::new(RecordingNotifier::default()));
        let mut sub = svc.subscribe_to_messages(&id);

        svc.send_message(&id, &"alice".to_string(), "ping").await.unwrap();

        let change = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("change");
        let message: Message = change.document.decode().unwrap();
        assert_eq!(message.body, "ping");
    }
}
