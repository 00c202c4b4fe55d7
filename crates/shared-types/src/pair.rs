//! Canonical pair identifiers.
//!
//! For any two user identities `a` and `b`, `pair(a, b) = min + "_" + max`
//! under lexicographic order. The derivation is order-independent, so
//! concurrent writers on either side of a relationship collide on the same
//! document address instead of creating sibling documents.

use serde::{Deserialize, Serialize};

use crate::entities::UserId;

/// Deterministic identifier for an unordered pair of identities.
///
/// Used as the document id for both connection requests and conversations:
/// one logical relationship maps to one document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairId(String);

impl PairId {
    /// Derive the canonical id for the pair `(a, b)`.
    ///
    /// Symmetric: `PairId::of(a, b) == PairId::of(b, a)`.
    #[must_use]
    pub fn of(a: &UserId, b: &UserId) -> Self {
        let (lo, hi) = ordered(a, b);
        Self(format!("{lo}_{hi}"))
    }

    /// Wrap an already-derived canonical id (e.g. read back from the store).
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PairId> for String {
    fn from(id: PairId) -> Self {
        id.0
    }
}

/// Order two identities under the same total order `PairId` uses.
///
/// Friend records store their members in this order so a pair has exactly
/// one representation regardless of who queries.
#[must_use]
pub fn ordered<'a>(a: &'a UserId, b: &'a UserId) -> (&'a UserId, &'a UserId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
