//! # Subsystem Container
//!
//! Holds all subsystem instances and wires their ports.
//!
//! ## Initialization Order
//!
//! Subsystems are initialized in strict dependency order:
//!
//! ```text
//! Level 0: Document Store (no dependencies)
//! Level 1: Notification Relay (store, profiles)
//! Level 2: Connections, Messaging, Sessions (store + relay adapters)
//! ```
//!
//! ## Thread Safety
//!
//! Every service is behind an `Arc` and internally `Send + Sync`; the
//! container itself holds no locks and no mutable state.

use std::sync::Arc;

use tracing::info;

use shared_types::{SystemTimeSource, TimeSource, UserId};
use sm_01_document_store::{DocumentStore, InMemoryStore, RetryingStore};
use sm_02_connections::{ConnectionApi, ConnectionReconciler};
use sm_03_notifications::{LogOnlyMailer, NotificationRelay, NotificationsApi};
use sm_04_messaging::{MessagingApi, MessagingService};
use sm_05_sessions::{SessionsApi, SessionsService};

use crate::adapters::{
    RelayMessageNotifier, RelayNotificationSink, RelaySessionNotifier, StoreProfileDirectory,
};
use crate::config::{ConfigError, MeshConfig};
use crate::session::MeshSession;

/// Central container holding all subsystem instances.
///
/// This is the single place where subsystems meet: every cross-subsystem
/// edge is an adapter constructed here, and every service receives its
/// dependencies through its constructor.
pub struct MeshContainer {
    /// The shared store handle all subsystems write through.
    pub store: Arc<dyn DocumentStore>,
    /// Connection reconciliation (Subsystem 2).
    pub connections: Arc<dyn ConnectionApi>,
    /// Notification fan-out (Subsystem 3).
    pub notifications: Arc<dyn NotificationsApi>,
    /// Direct messaging (Subsystem 4).
    pub messaging: Arc<dyn MessagingApi>,
    /// Session scheduling (Subsystem 5).
    pub sessions: Arc<dyn SessionsApi>,
    /// Configuration (immutable after initialization).
    pub config: MeshConfig,
}

impl MeshContainer {
    /// Create a container over the default store: an in-memory backend
    /// behind the configured retry policy.
    pub fn new(config: MeshConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let store: Arc<dyn DocumentStore> = Arc::new(RetryingStore::new(
            InMemoryStore::with_capacity(config.store.channel_capacity),
            config.store.retry_policy(),
        ));
        Ok(Self::with_store(config, store))
    }

    /// Create a container over an externally constructed store.
    ///
    /// Tests use this to keep a handle on the backend for fault injection;
    /// a production embedding would pass its real store client here.
    pub fn with_store(config: MeshConfig, store: Arc<dyn DocumentStore>) -> Self {
        info!("[runtime] Initializing SkillMesh container");
        info!(
            "[runtime]   store: retry budget {} attempt(s), channel capacity {}",
            config.store.max_attempts, config.store.channel_capacity
        );

        let time: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);

        let profiles = Arc::new(StoreProfileDirectory::new(store.clone()));
        let mut relay = NotificationRelay::new(store.clone(), profiles, time.clone());
        if config.email.simulate_delivery {
            relay = relay.with_mailer(Arc::new(LogOnlyMailer));
            info!("[runtime]   email fan-out: simulated (log only)");
        }
        let notifications: Arc<dyn NotificationsApi> = Arc::new(relay);
        info!("[runtime]   [3] Notification relay initialized");

        let connections: Arc<dyn ConnectionApi> = Arc::new(ConnectionReconciler::new(
            store.clone(),
            Arc::new(RelayNotificationSink::new(notifications.clone())),
            time.clone(),
        ));
        info!("[runtime]   [2] Connection reconciler initialized");

        let messaging: Arc<dyn MessagingApi> = Arc::new(MessagingService::new(
            store.clone(),
            Arc::new(RelayMessageNotifier::new(notifications.clone())),
            time.clone(),
        ));
        info!("[runtime]   [4] Messaging service initialized");

        let sessions: Arc<dyn SessionsApi> = Arc::new(SessionsService::new(
            store.clone(),
            Arc::new(RelaySessionNotifier::new(notifications.clone())),
            time,
        ));
        info!("[runtime]   [5] Sessions service initialized");

        Self {
            store,
            connections,
            notifications,
            messaging,
            sessions,
            config,
        }
    }

    /// A caller-scoped facade bound to one authenticated user.
    ///
    /// Identity verification happens at the embedding's auth boundary; the
    /// mesh receives the already-established user id and never consults
    /// ambient state to discover the caller.
    #[must_use]
    pub fn session_for(self: &Arc<Self>, user: UserId) -> MeshSession {
        MeshSession::new(user, Arc::clone(self))
    }
}
