//! Outbound ports of the relay: email and profile lookups.

use async_trait::async_trait;
use shared_types::UserId;
use thiserror::Error;
use tracing::info;

/// Email delivery failure. Logged and swallowed by the relay.
#[derive(Debug, Error)]
#[error("Email delivery failed: {0}")]
pub struct EmailError(pub String);

/// An email about to leave the system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Recipient user id (address resolution is the sink's concern).
    pub to: UserId,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Outbound email port.
///
/// Template rendering and actual SMTP/vendor delivery are outside this
/// repository; the shipped adapter simulates delivery by logging.
#[async_trait]
pub trait EmailSink: Send + Sync {
    /// Send (or simulate sending) one email.
    async fn send(&self, email: OutboundEmail) -> Result<(), EmailError>;
}

/// Email "delivery" that writes the message to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlyMailer;

#[async_trait]
impl EmailSink for LogOnlyMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), EmailError> {
        info!(
            to = %email.to,
            subject = %email.subject,
            "[sm-03] Email delivery simulated"
        );
        Ok(())
    }
}

/// Read side of the external profile service.
///
/// Used only to decorate notification text with display names; failures
/// degrade to the raw user id.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Display name for a user, if their profile is known.
    async fn display_name(&self, user: &UserId) -> Option<String>;
}

/// Profile directory that knows nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProfiles;

#[async_trait]
impl ProfileDirectory for NoProfiles {
    async fn display_name(&self, _user: &UserId) -> Option<String> {
        None
    }
}
