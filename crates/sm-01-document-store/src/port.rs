//! The outbound port every subsystem persists through.

use async_trait::async_trait;

use crate::document::{Document, Fields};
use crate::error::StoreError;
use crate::query::{Filter, Ordering, Query};
use crate::subscription::ChangeSubscription;

/// Networked, schemaless key-document database.
///
/// Every read and write is an asynchronous network round trip. The store
/// resolves concurrent writes to a single document with last-write-wins and
/// offers no cross-document transaction; change events are delivered to
/// subscribers at least once.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, or `None` if absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Write the full field map at an address, creating or replacing.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Merge partial fields into an existing document.
    ///
    /// # Errors
    /// `MissingDocument` if the address is empty.
    async fn update(&self, collection: &str, id: &str, partial: Fields) -> Result<(), StoreError>;

    /// Fetch all documents in a collection matching every filter, optionally
    /// sorted on one field.
    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        ordering: Option<&Ordering>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Attach a change-feed subscription for documents matching the query.
    ///
    /// Dropping the returned handle unsubscribes.
    fn subscribe(&self, query: Query) -> ChangeSubscription;
}
