//! # Connection Lifecycle Flows
//!
//! End-to-end tests over a whole mesh: reconciler, relay, messaging and
//! sessions wired through the runtime container, backed by the in-memory
//! store.
//!
//! ## Flow Tested
//!
//! 1. **Request → Reject → Re-open → Accept**: the full state machine,
//!    including the sender-only re-open rule
//! 2. **Acceptance side effects**: friend record, conversation bootstrap,
//!    notification fan-out with natural-key dedup
//! 3. **Downstream gating**: messaging needs the bootstrapped conversation,
//!    sessions need the friend record

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_types::{ConnectionStatus, NotificationKind, PairId};
    use sm_01_document_store::DocumentStore;
    use sm_02_connections::{ConnectionError, Decision, RequestContext};
    use sm_04_messaging::MessagingError;
    use sm_05_sessions::SessionsError;
    use sm_runtime::{MeshConfig, MeshContainer};

    fn mesh() -> Arc<MeshContainer> {
        Arc::new(MeshContainer::new(MeshConfig::default()).expect("default config is valid"))
    }

    #[tokio::test]
    async fn test_reject_reopen_accept_lifecycle() {
        let mesh = mesh();
        let alice = mesh.session_for("alice".to_string());
        let bob = mesh.session_for("bob".to_string());

        // Alice asks, Bob declines.
        let request_id = alice
            .request_connection(
                &"bob".to_string(),
                RequestContext::for_skill("React").with_message("Trade for piano lessons?"),
            )
            .await
            .unwrap();
        bob.respond(&request_id, Decision::Rejected).await.unwrap();

        let request = alice.request_with(&"bob".to_string()).await.unwrap().unwrap();
        assert_eq!(request.status, ConnectionStatus::Rejected);
        assert!(!alice.is_connected_to(&"bob".to_string()).await.unwrap());

        // Bob cannot re-open a request he did not send.
        let err = bob
            .request_connection(&"alice".to_string(), RequestContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectionError::DuplicateRequest(_)));

        // Alice re-opens with fresh context; Bob accepts this time.
        alice
            .request_connection(&"bob".to_string(), RequestContext::for_skill("Rust"))
            .await
            .unwrap();
        let request = alice.request_with(&"bob".to_string()).await.unwrap().unwrap();
        assert_eq!(request.status, ConnectionStatus::Pending);
        assert_eq!(request.skill_name.as_deref(), Some("Rust"));

        bob.respond(&request_id, Decision::Accepted).await.unwrap();
        assert!(alice.is_connected_to(&"bob".to_string()).await.unwrap());
        assert!(bob.is_connected_to(&"alice".to_string()).await.unwrap());

        // Further requests against a settled pair are refused.
        let err = alice
            .request_connection(&"bob".to_string(), RequestContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectionError::AlreadyConnected(_)));
    }

    #[tokio::test]
    async fn test_notification_fanout_with_natural_key_dedup() {
        let mesh = mesh();
        let alice = mesh.session_for("alice".to_string());
        let bob = mesh.session_for("bob".to_string());

        let request_id = alice
            .request_connection(&"bob".to_string(), RequestContext::for_skill("React"))
            .await
            .unwrap();
        bob.respond(&request_id, Decision::Rejected).await.unwrap();
        alice
            .request_connection(&"bob".to_string(), RequestContext::for_skill("React"))
            .await
            .unwrap();
        bob.respond(&request_id, Decision::Accepted).await.unwrap();

        // Two requests, but the re-open overwrites the same natural key:
        // Bob ends with exactly one "requested" notification.
        let bob_unread = bob.unread_notifications().await.unwrap();
        assert_eq!(bob_unread.len(), 1);
        assert_eq!(bob_unread[0].kind, NotificationKind::ConnectionRequested);

        // Alice saw both outcomes.
        let alice_unread = alice.unread_notifications().await.unwrap();
        let kinds: Vec<_> = alice_unread.iter().map(|n| n.kind).collect();
        assert!(kinds.contains(&NotificationKind::ConnectionRejected));
        assert!(kinds.contains(&NotificationKind::ConnectionAccepted));

        // Reading is per-recipient and sticks.
        bob.mark_notification_read(&bob_unread[0].id).await.unwrap();
        assert!(bob.unread_notifications().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_acceptance_gates_messaging_and_sessions() {
        let mesh = mesh();
        let alice = mesh.session_for("alice".to_string());
        let bob = mesh.session_for("bob".to_string());

        // No conversation, no friendship: both downstream paths refuse.
        let err = alice
            .send_message_to(&"bob".to_string(), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, MessagingError::ConversationNotFound(_)));
        let err = alice
            .schedule_session(&"bob".to_string(), "Rust", 10_000)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionsError::NotConnected));

        let request_id = alice
            .request_connection(&"bob".to_string(), RequestContext::for_skill("Rust"))
            .await
            .unwrap();
        bob.respond(&request_id, Decision::Accepted).await.unwrap();

        // Acceptance bootstrapped the conversation at the pair id.
        alice.send_message_to(&"bob".to_string(), "hi").await.unwrap();
        bob.send_message_to(&"alice".to_string(), "hey").await.unwrap();
        let history = alice.messages_with(&"bob".to_string()).await.unwrap();
        let bodies: Vec<_> = history.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["hi", "hey"]);

        // And the friend record unlocked scheduling.
        let session = alice
            .schedule_session(&"bob".to_string(), "Rust", 10_000)
            .await
            .unwrap();
        assert!(session.meeting_link.starts_with("https://meet.skillmesh.io/"));

        let bob_sessions = bob.my_sessions().await.unwrap();
        assert_eq!(bob_sessions.len(), 1);
        assert_eq!(bob_sessions[0].id, session.id);

        // A message notification reached Bob alongside the session one.
        let bob_kinds: Vec<_> = bob
            .unread_notifications()
            .await
            .unwrap()
            .iter()
            .map(|n| n.kind)
            .collect();
        assert!(bob_kinds.contains(&NotificationKind::MessageReceived));
        assert!(bob_kinds.contains(&NotificationKind::SessionScheduled));
    }

    #[tokio::test]
    async fn test_accept_is_idempotent_for_side_effects() {
        let mesh = mesh();
        let alice = mesh.session_for("alice".to_string());
        let bob = mesh.session_for("bob".to_string());

        let request_id = alice
            .request_connection(&"bob".to_string(), RequestContext::default())
            .await
            .unwrap();
        bob.respond(&request_id, Decision::Accepted).await.unwrap();
        // Same decision again: no-op, not an error.
        bob.respond(&request_id, Decision::Accepted).await.unwrap();

        let pair = PairId::of(&"alice".to_string(), &"bob".to_string());
        let friends = mesh
            .store
            .query(shared_types::collections::FRIENDS, &[], None)
            .await
            .unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].id, pair.as_str());

        let conversations = mesh
            .store
            .query(shared_types::collections::CONVERSATIONS, &[], None)
            .await
            .unwrap();
        assert_eq!(conversations.len(), 1);
    }
}
