//! Document store collection names.
//!
//! Centralized so every subsystem addresses the same collections.

/// Connection requests, keyed by canonical pair id.
pub const CONNECTION_REQUESTS: &str = "connection_requests";

/// Friend records, keyed by canonical pair id.
pub const FRIENDS: &str = "friends";

/// Notifications, keyed by natural key or generated id.
pub const NOTIFICATIONS: &str = "notifications";

/// Conversations, keyed by canonical pair id.
pub const CONVERSATIONS: &str = "conversations";

/// Direct messages inside conversations.
pub const MESSAGES: &str = "messages";

/// Scheduled skill-exchange sessions.
pub const SESSIONS: &str = "sessions";

/// User profiles (owned by the external profile service; read-only here).
pub const PROFILES: &str = "profiles";
