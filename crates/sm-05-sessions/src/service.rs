//! Store-backed session scheduling service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use shared_types::{collections, PairId, Session, SessionStatus, TimeSource, Timestamp, UserId};
use sm_01_document_store::{fields_of, DocumentStore, Filter, Ordering};

use crate::error::SessionsError;

const MEETING_HOST: &str = "https://meet.skillmesh.io";

/// Delivery failure from the session notifier. Logged and swallowed.
#[derive(Debug, Error)]
#[error("Session notification failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound port: tells the other participant about session lifecycle events.
///
/// Implemented over the notification relay by a runtime adapter.
#[async_trait]
pub trait SessionNotifier: Send + Sync {
    /// Best-effort notification that a session was scheduled.
    async fn session_scheduled(&self, session: &Session) -> Result<(), NotifyError>;

    /// Best-effort notification that a session was cancelled.
    ///
    /// `cancelled_by` is the participant who cancelled; the other one
    /// is the notification recipient.
    async fn session_cancelled(
        &self,
        session: &Session,
        cancelled_by: &UserId,
    ) -> Result<(), NotifyError>;
}

/// Inbound port of the session scheduling subsystem.
#[async_trait]
pub trait SessionsApi: Send + Sync {
    /// Schedule a skill session between two connected users.
    ///
    /// The meeting link is generated here; there is no external meeting
    /// provider behind it.
    ///
    /// # Errors
    /// - `SelfSession` - host and guest are the same user
    /// - `NotConnected` - no friend record exists for the pair
    /// - `Store` - the write failed
    async fn schedule_session(
        &self,
        host_id: &UserId,
        guest_id: &UserId,
        skill_name: &str,
        scheduled_at: Timestamp,
    ) -> Result<Session, SessionsError>;

    /// Cancel a session. Only a participant may cancel; cancelling a
    /// session that is already cancelled is a no-op.
    async fn cancel_session(
        &self,
        session_id: &str,
        caller_id: &UserId,
    ) -> Result<(), SessionsError>;

    /// Fetch one session by id.
    async fn get_session(&self, session_id: &str) -> Result<Session, SessionsError>;

    /// All sessions the user participates in, soonest first.
    async fn sessions_for(&self, user_id: &UserId) -> Result<Vec<Session>, SessionsError>;
}

/// The session scheduling service.
pub struct SessionsService {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn SessionNotifier>,
    time: Arc<dyn TimeSource>,
}

impl SessionsService {
    /// Build a sessions service over injected dependencies.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn SessionNotifier>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            store,
            notifier,
            time,
        }
    }

    /// A pair is connected exactly when a friend record exists at the
    /// canonical pair id.
    async fn are_connected(&self, a: &UserId, b: &UserId) -> Result<bool, SessionsError> {
        let pair = PairId::of(a, b);
        Ok(self
            .store
            .get(collections::FRIENDS, pair.as_str())
            .await?
            .is_some())
    }

    async fn read_session(&self, id: &str) -> Result<Session, SessionsError> {
        let doc = self
            .store
            .get(collections::SESSIONS, id)
            .await?
            .ok_or_else(|| SessionsError::NotFound(id.to_string()))?;
        doc.decode::<Session>().map_err(SessionsError::from)
    }

    async fn sessions_where(
        &self,
        field: &str,
        user_id: &UserId,
    ) -> Result<Vec<Session>, SessionsError> {
        let docs = self
            .store
            .query(
                collections::SESSIONS,
                &[Filter::eq(field, user_id.as_str())],
                Some(&Ordering::ascending("scheduled_at")),
            )
            .await?;
        docs.iter()
            .map(|d| d.decode::<Session>().map_err(SessionsError::from))
            .collect()
    }
}

#[async_trait]
impl SessionsApi for SessionsService {
    async fn schedule_session(
        &self,
        host_id: &UserId,
        guest_id: &UserId,
        skill_name: &str,
        scheduled_at: Timestamp,
    ) -> Result<Session, SessionsError> {
        if host_id == guest_id {
            return Err(SessionsError::SelfSession);
        }
        if !self.are_connected(host_id, guest_id).await? {
            return Err(SessionsError::NotConnected);
        }

        let now = self.time.now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            host_id: host_id.clone(),
            guest_id: guest_id.clone(),
            skill_name: skill_name.to_string(),
            scheduled_at,
            meeting_link: format!("{MEETING_HOST}/{}", Uuid::new_v4()),
            status: SessionStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };
        self.store
            .set(collections::SESSIONS, &session.id, fields_of(&session)?)
            .await?;
        info!(session = %session.id, host = %host_id, guest = %guest_id, skill = %skill_name, "[sm-05] Session scheduled");

        if let Err(e) = self.notifier.session_scheduled(&session).await {
            warn!(session = %session.id, error = %e, "[sm-05] Scheduling notification failed; session already stored");
        }

        Ok(session)
    }

    async fn cancel_session(
        &self,
        session_id: &str,
        caller_id: &UserId,
    ) -> Result<(), SessionsError> {
        let session = self.read_session(session_id).await?;
        if caller_id != &session.host_id && caller_id != &session.guest_id {
            return Err(SessionsError::NotAuthorized(session_id.to_string()));
        }
        if session.status == SessionStatus::Cancelled {
            info!(session = %session_id, "[sm-05] Session already cancelled; nothing to do");
            return Ok(());
        }

        let mut partial = serde_json::Map::new();
        partial.insert("status".into(), json!(SessionStatus::Cancelled));
        partial.insert("updated_at".into(), json!(self.time.now()));
        self.store
            .update(collections::SESSIONS, session_id, partial)
            .await?;
        info!(session = %session_id, by = %caller_id, "[sm-05] Session cancelled");

        if let Err(e) = self.notifier.session_cancelled(&session, caller_id).await {
            warn!(session = %session_id, error = %e, "[sm-05] Cancellation notification failed; cancel already stored");
        }

        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> Result<Session, SessionsError> {
        self.read_session(session_id).await
    }

    async fn sessions_for(&self, user_id: &UserId) -> Result<Vec<Session>, SessionsError> {
        // Equality filters cannot express "host OR guest", so two queries
        // merged by scheduled time.
        let mut sessions = self.sessions_where("host_id", user_id).await?;
        sessions.extend(self.sessions_where("guest_id", user_id).await?);
        sessions.sort_by_key(|s| s.scheduled_at);
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Friend;
    use sm_01_document_store::InMemoryStore;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};

    struct SteppingClock(AtomicU64);

    impl TimeSource for SteppingClock {
        fn now(&self) -> Timestamp {
            1_000 + self.0.fetch_add(1_000, AtomicOrdering::SeqCst)
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        scheduled: parking_lot::Mutex<Vec<String>>,
        cancelled: parking_lot::Mutex<Vec<(String, UserId)>>,
        failing: AtomicBool,
    }

    #[async_trait]
    impl SessionNotifier for RecordingNotifier {
        async fn session_scheduled(&self, session: &Session) -> Result<(), NotifyError> {
            if self.failing.load(AtomicOrdering::SeqCst) {
                return Err(NotifyError("relay down".into()));
            }
            self.scheduled.lock().push(session.id.clone());
            Ok(())
        }

        async fn session_cancelled(
            &self,
            session: &Session,
            cancelled_by: &UserId,
        ) -> Result<(), NotifyError> {
            if self.failing.load(AtomicOrdering::SeqCst) {
                return Err(NotifyError("relay down".into()));
            }
            self.cancelled
                .lock()
                .push((session.id.clone(), cancelled_by.clone()));
            Ok(())
        }
    }

    async fn seed_friendship(store: &InMemoryStore, a: &str, b: &str) {
        let (a, b) = (a.to_string(), b.to_string());
        let friend = Friend::between(&a, &b, PairId::of(&a, &b), 1);
        store
            .set(
                collections::FRIENDS,
                friend.id.as_str(),
                fields_of(&friend).unwrap(),
            )
            .await
            .unwrap();
    }

    fn service(
        store: Arc<InMemoryStore>,
        notifier: Arc<RecordingNotifier>,
    ) -> SessionsService {
        SessionsService::new(store, notifier, Arc::new(SteppingClock(AtomicU64::new(0))))
    }

    #[tokio::test]
    async fn test_scheduling_requires_friendship() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(store.clone(), Arc::new(RecordingNotifier::default()));

        let err = svc
            .schedule_session(&"alice".to_string(), &"bob".to_string(), "Rust", 5_000)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionsError::NotConnected));
        assert_eq!(store.count(collections::SESSIONS), 0);

        let err = svc
            .schedule_session(&"alice".to_string(), &"alice".to_string(), "Rust", 5_000)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionsError::SelfSession));
    }

    #[tokio::test]
    async fn test_scheduled_session_gets_generated_link_and_notifies_guest() {
        let store = Arc::new(InMemoryStore::new());
        seed_friendship(&store, "alice", "bob").await;
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(store.clone(), notifier.clone());

        let session = svc
            .schedule_session(&"alice".to_string(), &"bob".to_string(), "Rust", 5_000)
            .await
            .unwrap();

        assert!(session.meeting_link.starts_with("https://meet.skillmesh.io/"));
        assert_eq!(session.status, SessionStatus::Scheduled);
        assert_eq!(store.count(collections::SESSIONS), 1);
        assert_eq!(*notifier.scheduled.lock(), vec![session.id.clone()]);

        let fetched = svc.get_session(&session.id).await.unwrap();
        assert_eq!(fetched.meeting_link, session.meeting_link);
    }

    #[tokio::test]
    async fn test_cancel_is_participant_only_and_idempotent() {
        let store = Arc::new(InMemoryStore::new());
        seed_friendship(&store, "alice", "bob").await;
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(store, notifier.clone());

        let session = svc
            .schedule_session(&"alice".to_string(), &"bob".to_string(), "Rust", 5_000)
            .await
            .unwrap();

        let err = svc
            .cancel_session(&session.id, &"mallory".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionsError::NotAuthorized(_)));

        svc.cancel_session(&session.id, &"bob".to_string()).await.unwrap();
        let fetched = svc.get_session(&session.id).await.unwrap();
        assert_eq!(fetched.status, SessionStatus::Cancelled);
        assert!(fetched.updated_at > session.updated_at);

        // Repeat cancel is a no-op and does not notify again.
        svc.cancel_session(&session.id, &"alice".to_string()).await.unwrap();
        assert_eq!(notifier.cancelled.lock().len(), 1);
        assert_eq!(
            notifier.cancelled.lock()[0],
            (session.id.clone(), "bob".to_string())
        );
    }

    #[tokio::test]
    async fn test_cancel_unknown_session() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(store, Arc::new(RecordingNotifier::default()));

        let err = svc
            .cancel_session("no-such-session", &"alice".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_sessions_for_merges_host_and_guest_roles() {
        let store = Arc::new(InMemoryStore::new());
        seed_friendship(&store, "alice", "bob").await;
        seed_friendship(&store, "alice", "carol").await;
        let svc = service(store, Arc::new(RecordingNotifier::default()));

        svc.schedule_session(&"alice".to_string(), &"bob".to_string(), "Rust", 9_000)
            .await
            .unwrap();
        svc.schedule_session(&"carol".to_string(), &"alice".to_string(), "Piano", 4_000)
            .await
            .unwrap();

        let sessions = svc.sessions_for(&"alice".to_string()).await.unwrap();
        let skills: Vec<_> = sessions.iter().map(|s| s.skill_name.as_str()).collect();
        assert_eq!(skills, vec!["Piano", "Rust"]);

        assert!(svc.sessions_for(&"dave".to_string()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_fail_scheduling() {
        let store = Arc::new(InMemoryStore::new());
        seed_friendship(&store, "alice", "bob").await;
        let notifier = Arc::new(RecordingNotifier::default());
        notifier.failing.store(true, AtomicOrdering::SeqCst);
        let svc = service(store.clone(), notifier);

        svc.schedule_session(&"alice".to_string(), &"bob".to_string(), "Rust", 5_000)
            .await
            .unwrap();
        assert_eq!(store.count(collections::SESSIONS), 1);
    }
}
