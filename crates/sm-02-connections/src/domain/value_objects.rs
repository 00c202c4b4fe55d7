//! Value objects for reconciler operations.

use shared_types::ConnectionStatus;

/// Free-text context carried by a connection request.
///
/// Immutable after creation, except on re-open, where provided fields
/// replace the stored ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Skill the request is about.
    pub skill_name: Option<String>,
    /// Message from the sender.
    pub message: Option<String>,
}

impl RequestContext {
    /// Context mentioning a skill.
    #[must_use]
    pub fn for_skill(skill_name: impl Into<String>) -> Self {
        Self {
            skill_name: Some(skill_name.into()),
            message: None,
        }
    }

    /// Attach a message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Recipient's decision on a pending request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Accept the connection.
    Accepted,
    /// Reject it; the original sender may re-open later.
    Rejected,
}

impl Decision {
    /// The status this decision transitions the request into.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        match self {
            Self::Accepted => ConnectionStatus::Accepted,
            Self::Rejected => ConnectionStatus::Rejected,
        }
    }
}
