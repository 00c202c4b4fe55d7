//! Core domain entities shared across subsystems.
//!
//! All records are plain serde structs stored as schemaless documents.
//! Timestamps are milliseconds since the UNIX epoch.

use serde::{Deserialize, Serialize};

use crate::pair::{ordered, PairId};

/// Opaque user identity string issued by the identity provider.
pub type UserId = String;

/// Timestamp in milliseconds since UNIX epoch.
pub type Timestamp = u64;

/// Status of a connection request.
///
/// State machine:
/// ```text
/// (none) ──request──→ [PENDING] ──accept──→ [ACCEPTED]
///                         ↑  │
///                         │  └──reject──→ [REJECTED]
///                         │                    │
///                         └── re-open (original sender only) ──┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// Awaiting a response from the recipient.
    Pending,
    /// Recipient accepted; the pair are friends.
    Accepted,
    /// Recipient rejected; the original sender may re-open.
    Rejected,
}

/// A connection request between two users.
///
/// Keyed by the canonical pair id, so creation is idempotent per unordered
/// pair. Never hard-deleted: rejection is a status value, which preserves
/// audit history and allows a rejected pair to be re-opened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    /// Canonical pair id (document key).
    pub id: PairId,
    /// Who initiated the request. Original directionality is preserved in
    /// the record even though the document key is order-independent.
    pub sender_id: UserId,
    /// Who the request is addressed to.
    pub recipient_id: UserId,
    /// Current state.
    pub status: ConnectionStatus,
    /// Optional skill this request is about.
    pub skill_name: Option<String>,
    /// Optional free-text message from the sender.
    pub message: Option<String>,
    /// Creation time (ms).
    pub created_at: Timestamp,
    /// Set on every status transition (ms).
    pub updated_at: Timestamp,
}

impl ConnectionRequest {
    /// Create a fresh pending request from `sender_id` to `recipient_id`.
    #[must_use]
    pub fn pending(
        sender_id: UserId,
        recipient_id: UserId,
        skill_name: Option<String>,
        message: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: PairId::of(&sender_id, &recipient_id),
            sender_id,
            recipient_id,
            status: ConnectionStatus::Pending,
            skill_name,
            message,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the request is awaiting a response.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ConnectionStatus::Pending
    }
}

/// Friend record derived from an accepted connection request.
///
/// INVARIANT: exists if and only if some request between the pair is
/// accepted. Created exactly once per pair, on the transition into
/// accepted; never updated or deleted in normal operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    /// Canonical pair id (document key).
    pub id: PairId,
    /// Lexicographically smaller member.
    pub user_a: UserId,
    /// Lexicographically larger member.
    pub user_b: UserId,
    /// Back-reference to the request that produced this record.
    pub connection_request_id: PairId,
    /// Creation time (ms).
    pub created_at: Timestamp,
}

impl Friend {
    /// Build the friend record for a pair, storing members in sorted order.
    #[must_use]
    pub fn between(a: &UserId, b: &UserId, request_id: PairId, now: Timestamp) -> Self {
        let (lo, hi) = ordered(a, b);
        Self {
            id: PairId::of(a, b),
            user_a: lo.clone(),
            user_b: hi.clone(),
            connection_request_id: request_id,
            created_at: now,
        }
    }
}

/// Kind of a notification, used for natural-key dedup and UI routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone sent (or re-opened) a connection request.
    ConnectionRequested,
    /// A connection request was accepted.
    ConnectionAccepted,
    /// A connection request was rejected.
    ConnectionRejected,
    /// A direct message arrived.
    MessageReceived,
    /// A session was scheduled with the recipient.
    SessionScheduled,
    /// A session the recipient was part of was cancelled.
    SessionCancelled,
}

impl NotificationKind {
    /// Stable string form used in natural keys.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectionRequested => "connection_requested",
            Self::ConnectionAccepted => "connection_accepted",
            Self::ConnectionRejected => "connection_rejected",
            Self::MessageReceived => "message_received",
            Self::SessionScheduled => "session_scheduled",
            Self::SessionCancelled => "session_cancelled",
        }
    }
}

/// In-app notification, owned by its recipient.
///
/// Mutated only by the recipient (marking read) or by the system at
/// creation. Never mutated by the sender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Document key (natural key for reconciler-driven notifications).
    pub id: String,
    /// Owner of the notification.
    pub recipient_id: UserId,
    /// Who triggered it.
    pub sender_id: UserId,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Human-readable message.
    pub message: String,
    /// Whether the recipient has read it.
    pub read: bool,
    /// Back-reference to a connection request, if any.
    pub request_id: Option<PairId>,
    /// Back-reference to a session, if any.
    pub session_id: Option<String>,
    /// Creation time (ms).
    pub created_at: Timestamp,
}

/// Conversation bootstrapped when a connection is accepted.
///
/// Keyed by the same canonical pair id as the connection request; created
/// lazily, at most once per pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Canonical pair id (document key).
    pub id: PairId,
    /// The two participants.
    pub participants: [UserId; 2],
    /// Creation time (ms).
    pub created_at: Timestamp,
}

impl Conversation {
    /// Bootstrap a conversation between two users.
    #[must_use]
    pub fn between(a: &UserId, b: &UserId, now: Timestamp) -> Self {
        let (lo, hi) = ordered(a, b);
        Self {
            id: PairId::of(a, b),
            participants: [lo.clone(), hi.clone()],
            created_at: now,
        }
    }

    /// Returns true if `user` is one of the participants.
    #[must_use]
    pub fn has_participant(&self, user: &UserId) -> bool {
        self.participants.iter().any(|p| p == user)
    }

    /// The participant other than `user`, if `user` participates.
    #[must_use]
    pub fn other_participant(&self, user: &UserId) -> Option<&UserId> {
        if !self.has_participant(user) {
            return None;
        }
        self.participants.iter().find(|p| *p != user)
    }
}

/// A direct message inside a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Document key (generated).
    pub id: String,
    /// Conversation this message belongs to.
    pub conversation_id: PairId,
    /// Author; must be a participant of the conversation.
    pub sender_id: UserId,
    /// Message body.
    pub body: String,
    /// Send time (ms).
    pub sent_at: Timestamp,
}

/// Status of a scheduled session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Upcoming.
    Scheduled,
    /// Cancelled by a participant.
    Cancelled,
    /// Took place.
    Completed,
}

/// A scheduled skill-exchange session between two connected users.
///
/// The meeting link is an opaque generated URL; there is no vendor
/// integration behind it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Document key (generated).
    pub id: String,
    /// Who offers the session.
    pub host_id: UserId,
    /// Who attends.
    pub guest_id: UserId,
    /// Skill the session is about.
    pub skill_name: String,
    /// Scheduled start time (ms).
    pub scheduled_at: Timestamp,
    /// Generated meeting link.
    pub meeting_link: String,
    /// Current status.
    pub status: SessionStatus,
    /// Creation time (ms).
    pub created_at: Timestamp,
    /// Set on every status transition (ms).
    pub updated_at: Timestamp,
}
