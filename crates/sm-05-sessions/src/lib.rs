//! # SM-05 Session Scheduling
//!
//! Skill-exchange sessions between connected users.
//!
//! ## Rules
//!
//! - A session can only be scheduled between two distinct users who are
//!   friends (a friend record exists for the pair).
//! - The meeting link is generated locally (`https://meet.skillmesh.io/` +
//!   UUID); there is deliberately no meeting vendor integration behind it.
//! - Only a participant may cancel; cancelling an already-cancelled session
//!   is a no-op.
//! - The other participant gets a best-effort notification on scheduling
//!   and cancellation.

pub mod error;
pub mod service;

pub use error::SessionsError;
pub use service::{NotifyError, SessionNotifier, SessionsApi, SessionsService};
