//! # SM-04 Direct Messaging
//!
//! Messages inside the conversations the reconciler bootstraps on
//! acceptance.
//!
//! ## Rules
//!
//! - A message can only be sent into an existing conversation, by one of
//!   its two participants.
//! - Message bodies are free text but must be non-empty.
//! - The other participant gets a best-effort notification; listing and
//!   live delivery go through the store (query + change feed).
//!
//! Conversations themselves are never created here; the reconciler
//! (Subsystem 2) owns that side effect.

pub mod error;
pub mod service;

pub use error::MessagingError;
pub use service::{MessageNotifier, MessagingApi, MessagingService, NotifyError};
