//! # SM-03 Notification Relay
//!
//! Thin fan-out from a subsystem event to a recipient-scoped notification
//! record, consumed by UI subscriptions through the document store's push
//! feed.
//!
//! ## Purpose
//!
//! No queuing, no ordering guarantee beyond the store's own per-document
//! timestamps, and no deduplication beyond natural key design: a
//! reconciler-driven notification is keyed `"{request_id}:{kind}"`, so one
//! notification exists per request per transition kind and a re-opened
//! request overwrites its earlier "requested" entry instead of accumulating
//! duplicates.
//!
//! ## Ownership
//!
//! A notification is owned by its recipient: the system writes it once, and
//! only the recipient may mutate it (marking it read). The relay enforces
//! this on `mark_read`.
//!
//! ## Email simulation
//!
//! The original platform simulates outbound email. The relay mirrors that
//! with an optional [`EmailSink`] port whose shipped adapter logs the email
//! instead of sending; sink failures never fail `notify`.

pub mod error;
pub mod ports;
pub mod relay;

pub use error::RelayError;
pub use ports::{EmailError, EmailSink, LogOnlyMailer, NoProfiles, OutboundEmail, ProfileDirectory};
pub use relay::{NewNotification, NotificationRelay, NotificationsApi};
