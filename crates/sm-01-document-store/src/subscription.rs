//! Push-based change feed.
//!
//! The store fans out every committed write as a [`DocumentChange`] on a
//! broadcast channel; a [`ChangeSubscription`] filters that firehose down to
//! the documents matching its query.

use std::pin::Pin;
use std::task::{Context, Poll};

use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;

use crate::document::Document;
use crate::query::Query;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The change feed was closed (store dropped).
    #[error("Change feed closed")]
    Closed,
}

/// A committed write, as pushed to subscribers.
#[derive(Clone, Debug)]
pub struct DocumentChange {
    /// The document after the write.
    pub document: Document,
}

/// A live subscription to changes matching one query.
///
/// Delivery is at-least-once; a slow subscriber may lag and lose events,
/// which is logged and skipped rather than surfaced as an error.
pub struct ChangeSubscription {
    receiver: broadcast::Receiver<DocumentChange>,
    query: Query,
}

impl ChangeSubscription {
    /// Create a subscription over a broadcast receiver.
    pub(crate) fn new(receiver: broadcast::Receiver<DocumentChange>, query: Query) -> Self {
        Self { receiver, query }
    }

    /// Receive the next change matching the query.
    ///
    /// Returns `None` when the feed is closed.
    pub async fn recv(&mut self) -> Option<DocumentChange> {
        loop {
            let change = match self.receiver.recv().await {
                Ok(c) => c,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some changes dropped");
                    continue;
                }
            };

            if self.query.matches(&change.document) {
                return Some(change);
            }
            // Change doesn't match the query, keep waiting
        }
    }

    /// Try to receive the next matching change without blocking.
    ///
    /// # Returns
    /// - `Ok(Some(change))` - a matching change was available
    /// - `Ok(None)` - nothing available (would block)
    /// - `Err(SubscriptionError::Closed)` - the feed was closed
    pub fn try_recv(&mut self) -> Result<Option<DocumentChange>, SubscriptionError> {
        loop {
            let change = match self.receiver.try_recv() {
                Ok(c) => c,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.query.matches(&change.document) {
                return Ok(Some(change));
            }
        }
    }

    /// The query this subscription filters on.
    #[must_use]
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Wrap the subscription into a [`ChangeStream`].
    #[must_use]
    pub fn into_stream(self) -> ChangeStream {
        ChangeStream::new(self)
    }
}

/// A stream wrapper for subscriptions, for use with stream combinators.
///
/// Built on [`BroadcastStream`] so an idle stream parks until the channel
/// wakes it, rather than re-polling in a loop.
pub struct ChangeStream {
    inner: BroadcastStream<DocumentChange>,
    query: Query,
}

impl ChangeStream {
    /// Create a new change stream from a subscription.
    #[must_use]
    pub fn new(subscription: ChangeSubscription) -> Self {
        Self {
            inner: BroadcastStream::new(subscription.receiver),
            query: subscription.query,
        }
    }

    /// The query this stream filters on.
    #[must_use]
    pub fn query(&self) -> &Query {
        &self.query
    }
}

impl Stream for ChangeStream {
    type Item = DocumentChange;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(change))) => {
                    if this.query.matches(&change.document) {
                        return Poll::Ready(Some(change));
                    }
                    // Not ours, keep draining
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    debug!(lagged = count, "Subscriber lagged, some changes dropped");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
