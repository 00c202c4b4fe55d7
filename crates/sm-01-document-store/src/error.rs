//! Store error types.

use thiserror::Error;

/// Errors surfaced by the document store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (network, permission, backend outage).
    ///
    /// Wraps whatever the underlying client reported; this is the only
    /// variant a retry policy treats as transient.
    #[error("Store unavailable: {reason}")]
    Unavailable {
        /// Underlying cause, preserved for logging.
        reason: String,
    },

    /// Update addressed a document that does not exist.
    #[error("Missing document: {collection}/{id}")]
    MissingDocument {
        /// Collection name.
        collection: String,
        /// Document id.
        id: String,
    },

    /// A record failed to encode to or decode from document fields.
    #[error("Serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Shorthand for a transport failure.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Returns true if retrying the operation could succeed.
    ///
    /// Logical outcomes (missing documents, malformed records) are never
    /// transient; only transport failures are.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
