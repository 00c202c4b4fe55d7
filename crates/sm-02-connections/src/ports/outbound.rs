//! Outbound (driven) ports for the connection subsystem.

use async_trait::async_trait;
use shared_types::{NotificationKind, PairId, UserId};
use thiserror::Error;

pub use shared_types::{SystemTimeSource, TimeSource};

/// Delivery failure from a notification sink.
///
/// The reconciler logs and swallows this; the connection write is the
/// source of truth and the notification is best-effort advisory.
#[derive(Debug, Error)]
#[error("Notification delivery failed: {0}")]
pub struct SinkError(pub String);

/// A connection transition to be fanned out as a notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionNotice {
    /// Who the notification is for.
    pub recipient_id: UserId,
    /// Who triggered the transition.
    pub sender_id: UserId,
    /// Which transition happened.
    pub kind: NotificationKind,
    /// The request the transition belongs to.
    pub request_id: PairId,
    /// Skill context, if the request carries one.
    pub skill_name: Option<String>,
}

/// Where reconciler transitions are fanned out to.
///
/// Implemented by the notification relay (Subsystem 3) through a runtime
/// adapter; the reconciler never calls the relay directly.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a notice. Best-effort: callers log failures and move on.
    async fn deliver(&self, notice: ConnectionNotice) -> Result<(), SinkError>;
}

/// Recording sink for tests: captures notices, optionally failing each
/// delivery to exercise the swallow path.
#[derive(Default)]
pub struct RecordingSink {
    notices: parking_lot::Mutex<Vec<ConnectionNotice>>,
    failing: std::sync::atomic::AtomicBool,
}

impl RecordingSink {
    /// A sink that records every delivery.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every delivery fail from now on.
    pub fn start_failing(&self) {
        self.failing
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }

    /// Everything delivered so far.
    #[must_use]
    pub fn delivered(&self) -> Vec<ConnectionNotice> {
        self.notices.lock().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, notice: ConnectionNotice) -> Result<(), SinkError> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SinkError("injected sink failure".into()));
        }
        self.notices.lock().push(notice);
        Ok(())
    }
}
