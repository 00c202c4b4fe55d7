//! Retry policy at the store client boundary.
//!
//! One configurable policy object applied uniformly to every store call,
//! instead of fixed sleeps scattered per call site. Only transient
//! (`Unavailable`) failures are retried; logical outcomes pass through
//! untouched.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::document::{Document, Fields};
use crate::error::StoreError;
use crate::port::DocumentStore;
use crate::query::{Filter, Ordering, Query};
use crate::subscription::ChangeSubscription;

/// Delay schedule between attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backoff {
    /// Retry immediately.
    None,
    /// Fixed delay between attempts.
    Fixed(Duration),
    /// Doubling delay starting at `initial`, capped at `cap`.
    Exponential {
        /// Delay before the second attempt.
        initial: Duration,
        /// Upper bound on any single delay.
        cap: Duration,
    },
}

impl Backoff {
    /// Delay after the given 1-based attempt number.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => *d,
            Self::Exponential { initial, cap } => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                initial.saturating_mul(factor).min(*cap)
            }
        }
    }
}

/// Retry policy parameterized by attempt budget and backoff schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (minimum 1).
    pub max_attempts: u32,
    /// Delay schedule between attempts.
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::None,
        }
    }

    /// Override the attempt budget.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Exponential {
                initial: Duration::from_millis(50),
                cap: Duration::from_secs(2),
            },
        }
    }
}

/// Decorator applying a [`RetryPolicy`] to every operation of an inner
/// [`DocumentStore`].
///
/// Subscriptions are local handles and are not retried.
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: DocumentStore> RetryingStore<S> {
    /// Wrap a store with a retry policy.
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// The active policy.
    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

macro_rules! with_retry {
    ($self:ident, $op:literal, $call:expr) => {{
        let mut attempt: u32 = 1;
        loop {
            match $call {
                Ok(value) => break Ok(value),
                Err(e) if e.is_transient() && attempt < $self.policy.max_attempts => {
                    let delay = $self.policy.backoff.delay(attempt);
                    warn!(
                        op = $op,
                        attempt,
                        max_attempts = $self.policy.max_attempts,
                        error = %e,
                        "[sm-01] Transient store failure, retrying"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => break Err(e),
            }
        }
    }};
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for RetryingStore<S> {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        with_retry!(self, "get", self.inner.get(collection, id).await)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        with_retry!(self, "set", self.inner.set(collection, id, fields.clone()).await)
    }

    async fn update(&self, collection: &str, id: &str, partial: Fields) -> Result<(), StoreError> {
        with_retry!(
            self,
            "update",
            self.inner.update(collection, id, partial.clone()).await
        )
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        ordering: Option<&Ordering>,
    ) -> Result<Vec<Document>, StoreError> {
        with_retry!(self, "query", self.inner.query(collection, filters, ordering).await)
    }

    fn subscribe(&self, query: Query) -> ChangeSubscription {
        self.inner.subscribe(query)
    }
}
