//! # Change-Feed Subscriptions Across Subsystems
//!
//! A subscriber opened through one subsystem observes writes performed by
//! another, because every feed is scoped filtering over the same store
//! change channel.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    use shared_types::{ConnectionRequest, Message, Notification, NotificationKind};
    use sm_02_connections::{Decision, RequestContext};
    use sm_runtime::{MeshConfig, MeshContainer};

    fn mesh() -> Arc<MeshContainer> {
        Arc::new(MeshContainer::new(MeshConfig::default()).expect("default config is valid"))
    }

    #[tokio::test]
    async fn test_incoming_request_feed_sees_new_and_reopened_requests() {
        let mesh = mesh();
        let alice = mesh.session_for("alice".to_string());
        let bob = mesh.session_for("bob".to_string());
        let mut feed = bob.incoming_requests();

        let request_id = alice
            .request_connection(&"bob".to_string(), RequestContext::for_skill("React"))
            .await
            .unwrap();

        let change = timeout(Duration::from_millis(100), feed.recv())
            .await
            .expect("timeout waiting for request change")
            .expect("feed open");
        let request: ConnectionRequest = change.document.decode().unwrap();
        assert!(request.is_pending());
        assert_eq!(request.sender_id, "alice");

        // The rejection write is not pending, so the pending-only feed
        // stays quiet; the re-open shows up again.
        bob.respond(&request_id, Decision::Rejected).await.unwrap();
        alice
            .request_connection(&"bob".to_string(), RequestContext::for_skill("Rust"))
            .await
            .unwrap();

        let change = timeout(Duration::from_millis(100), feed.recv())
            .await
            .expect("timeout waiting for re-open")
            .expect("feed open");
        let request: ConnectionRequest = change.document.decode().unwrap();
        assert!(request.is_pending());
        assert_eq!(request.skill_name.as_deref(), Some("Rust"));
    }

    #[tokio::test]
    async fn test_notification_feed_crosses_subsystems() {
        let mesh = mesh();
        let alice = mesh.session_for("alice".to_string());
        let bob = mesh.session_for("bob".to_string());

        let request_id = alice
            .request_connection(&"bob".to_string(), RequestContext::default())
            .await
            .unwrap();
        bob.respond(&request_id, Decision::Accepted).await.unwrap();

        // Subscribe after the handshake; only new fan-out arrives.
        let mut feed = bob.notification_feed();
        alice.send_message_to(&"bob".to_string(), "ping").await.unwrap();

        let change = timeout(Duration::from_millis(100), feed.recv())
            .await
            .expect("timeout waiting for notification")
            .expect("feed open");
        let note: Notification = change.document.decode().unwrap();
        assert_eq!(note.kind, NotificationKind::MessageReceived);
        assert_eq!(note.sender_id, "alice");
    }

    #[tokio::test]
    async fn test_conversation_feed_as_stream() {
        let mesh = mesh();
        let alice = mesh.session_for("alice".to_string());
        let bob = mesh.session_for("bob".to_string());

        let request_id = alice
            .request_connection(&"bob".to_string(), RequestContext::default())
            .await
            .unwrap();
        bob.respond(&request_id, Decision::Accepted).await.unwrap();

        let mut stream = alice.conversation_feed(&"bob".to_string()).into_stream();
        bob.send_message_to(&"alice".to_string(), "one").await.unwrap();
        bob.send_message_to(&"alice".to_string(), "two").await.unwrap();

        let mut bodies = Vec::new();
        for _ in 0..2 {
            let change = timeout(Duration::from_millis(100), stream.next())
                .await
                .expect("timeout waiting for message")
                .expect("stream open");
            let message: Message = change.document.decode().unwrap();
            bodies.push(message.body);
        }
        assert_eq!(bodies, vec!["one", "two"]);
    }
}
