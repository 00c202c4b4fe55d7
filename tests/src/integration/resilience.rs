//! # Retry Behavior Under Injected Store Faults
//!
//! The retry decorator sits between every subsystem and the backend, so a
//! transient outage shorter than the attempt budget is invisible to
//! callers, and a longer one surfaces as a store error without corrupting
//! subsystem state.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sm_01_document_store::{
        Backoff, DocumentStore, InMemoryStore, RetryPolicy, RetryingStore, StoreError,
    };
    use sm_02_connections::{ConnectionError, Decision, RequestContext};
    use sm_runtime::{MeshConfig, MeshContainer};

    /// Three immediate attempts, no delays, so tests stay fast.
    fn no_wait_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff: Backoff::None,
        }
    }

    fn faulty_mesh() -> (Arc<MeshContainer>, Arc<RetryingStore<InMemoryStore>>) {
        let store = Arc::new(RetryingStore::new(InMemoryStore::new(), no_wait_policy()));
        let mesh = Arc::new(MeshContainer::with_store(
            MeshConfig::default(),
            store.clone(),
        ));
        (mesh, store)
    }

    #[tokio::test]
    async fn test_transient_outage_within_budget_is_invisible() {
        let (mesh, store) = faulty_mesh();
        let alice = mesh.session_for("alice".to_string());

        // First read attempt of the duplicate check fails; the retry
        // succeeds and the request goes through.
        store.inner().inject_read_failures(1);
        alice
            .request_connection(&"bob".to_string(), RequestContext::for_skill("Rust"))
            .await
            .unwrap();

        // Same for the write side of a response.
        let bob = mesh.session_for("bob".to_string());
        let request = alice
            .request_with(&"bob".to_string())
            .await
            .unwrap()
            .unwrap();
        store.inner().inject_write_failures(2);
        bob.respond(&request.id, Decision::Accepted).await.unwrap();
        assert!(alice.is_connected_to(&"bob".to_string()).await.unwrap());
    }

    #[tokio::test]
    async fn test_outage_exceeding_budget_surfaces_as_store_error() {
        let (mesh, store) = faulty_mesh();
        let alice = mesh.session_for("alice".to_string());

        store.inner().inject_read_failures(3);
        let err = alice
            .request_connection(&"bob".to_string(), RequestContext::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::Store(StoreError::Unavailable { .. })
        ));

        // The outage left nothing behind; once healthy, the request works.
        assert!(alice
            .request_with(&"bob".to_string())
            .await
            .unwrap()
            .is_none());
        alice
            .request_connection(&"bob".to_string(), RequestContext::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_logical_errors_are_not_retried() {
        let (mesh, store) = faulty_mesh();
        let alice = mesh.session_for("alice".to_string());

        alice
            .request_connection(&"bob".to_string(), RequestContext::default())
            .await
            .unwrap();

        // A duplicate is a logical outcome: it must not consume injected
        // faults by retrying.
        store.inner().inject_write_failures(3);
        let err = alice
            .request_connection(&"bob".to_string(), RequestContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectionError::DuplicateRequest(_)));

        // All three injected write faults are still pending (enough to
        // exhaust the probe's attempt budget), proving the refused
        // duplicate attempted no write.
        let err = store
            .set("probe", "p-1", sm_01_document_store::Fields::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
    }
}
