//! In-memory document store adapter.
//!
//! Single-process stand-in for the hosted backend, used by tests and local
//! development. Behaves like the real thing at the boundary: last-write-wins
//! per document, change fan-out over a broadcast channel, and injectable
//! transport failures for exercising retry and side-effect paths.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use crate::document::{Document, Fields};
use crate::error::StoreError;
use crate::port::DocumentStore;
use crate::query::{compare_on, Filter, Ordering, Query};
use crate::subscription::{ChangeSubscription, DocumentChange};
use crate::DEFAULT_CHANNEL_CAPACITY;

/// In-memory implementation of [`DocumentStore`].
///
/// `BTreeMap` per collection keeps query results deterministic.
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Fields>>>,
    sender: broadcast::Sender<DocumentChange>,
    /// Remaining reads to fail with `Unavailable` (fault injection).
    failing_reads: AtomicU32,
    /// Remaining writes to fail with `Unavailable` (fault injection).
    failing_writes: AtomicU32,
}

impl InMemoryStore {
    /// Create a store with the default change-feed capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a store with a specific change-feed capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            collections: RwLock::new(HashMap::new()),
            sender,
            failing_reads: AtomicU32::new(0),
            failing_writes: AtomicU32::new(0),
        }
    }

    /// Make the next `n` reads fail with `StoreError::Unavailable`.
    pub fn inject_read_failures(&self, n: u32) {
        self.failing_reads.store(n, AtomicOrdering::SeqCst);
    }

    /// Make the next `n` writes fail with `StoreError::Unavailable`.
    pub fn inject_write_failures(&self, n: u32) {
        self.failing_writes.store(n, AtomicOrdering::SeqCst);
    }

    /// Number of documents currently in a collection.
    #[must_use]
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Number of attached change-feed subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn consume_fault(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(AtomicOrdering::SeqCst, AtomicOrdering::SeqCst, |n| {
                n.checked_sub(1)
            })
            .is_ok()
    }

    fn publish(&self, document: Document) {
        // No subscribers is fine; the send error only means nobody listened.
        let _ = self.sender.send(DocumentChange { document });
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        if Self::consume_fault(&self.failing_reads) {
            return Err(StoreError::unavailable("injected read failure"));
        }

        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document {
                collection: collection.to_string(),
                id: id.to_string(),
                fields: fields.clone(),
            }))
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        if Self::consume_fault(&self.failing_writes) {
            return Err(StoreError::unavailable("injected write failure"));
        }

        {
            let mut collections = self.collections.write();
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), fields.clone());
        }
        debug!(collection, id, "[sm-01] Document written");

        self.publish(Document {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
        });
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, partial: Fields) -> Result<(), StoreError> {
        if Self::consume_fault(&self.failing_writes) {
            return Err(StoreError::unavailable("injected write failure"));
        }

        let merged = {
            let mut collections = self.collections.write();
            let fields = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::MissingDocument {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })?;
            for (key, value) in partial {
                fields.insert(key, value);
            }
            fields.clone()
        };
        debug!(collection, id, "[sm-01] Document updated");

        self.publish(Document {
            collection: collection.to_string(),
            id: id.to_string(),
            fields: merged,
        });
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        ordering: Option<&Ordering>,
    ) -> Result<Vec<Document>, StoreError> {
        if Self::consume_fault(&self.failing_reads) {
            return Err(StoreError::unavailable("injected read failure"));
        }

        let collections = self.collections.read();
        let mut results: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| filters.iter().all(|f| f.matches(fields)))
                    .map(|(id, fields)| Document {
                        collection: collection.to_string(),
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some(ordering) = ordering {
            results.sort_by(|a, b| compare_on(ordering, &a.fields, &b.fields));
        }
        Ok(results)
    }

    fn subscribe(&self, query: Query) -> ChangeSubscription {
        debug!(collection = %query.collection, filters = query.filters.len(), "[sm-01] New change subscription");
        ChangeSubscription::new(self.sender.subscribe(), query)
    }
}
