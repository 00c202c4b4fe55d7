//! # Mesh Runtime
//!
//! Composition root for the SkillMesh core.
//!
//! ## Wiring
//!
//! ```text
//! MeshContainer
//!   ├── DocumentStore ........ RetryingStore<InMemoryStore>
//!   ├── ConnectionApi ........ ConnectionReconciler (sm-02)
//!   │     └── NotificationSink → RelayNotificationSink ─┐
//!   ├── NotificationsApi ..... NotificationRelay (sm-03) ←┘
//!   │     ├── ProfileDirectory → StoreProfileDirectory
//!   │     └── EmailSink ........ LogOnlyMailer (simulated)
//!   ├── MessagingApi ......... MessagingService (sm-04)
//!   │     └── MessageNotifier → RelayMessageNotifier ──→ relay
//!   └── SessionsApi .......... SessionsService (sm-05)
//!         └── SessionNotifier → RelaySessionNotifier ──→ relay
//! ```
//!
//! Subsystems never call each other directly; cross-subsystem delivery
//! always crosses an outbound port implemented here. Every dependency is
//! injected through constructors, so tests can stand up a whole mesh with
//! fakes and no process-global state exists anywhere.

pub mod adapters;
pub mod config;
pub mod container;
pub mod session;
pub mod telemetry;

pub use config::{ConfigError, EmailConfig, MeshConfig, StoreConfig};
pub use container::MeshContainer;
pub use session::MeshSession;
pub use telemetry::init_tracing;
