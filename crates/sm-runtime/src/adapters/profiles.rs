//! Profile directory backed by the document store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use shared_types::{collections, UserId};
use sm_01_document_store::DocumentStore;
use sm_03_notifications::ProfileDirectory;

/// Resolves display names from the `profiles` collection.
///
/// Profile writes belong to the account-management surface outside this
/// repository; the mesh only reads. Any failure degrades to `None`, which
/// the relay renders as the raw user id.
pub struct StoreProfileDirectory {
    store: Arc<dyn DocumentStore>,
}

impl StoreProfileDirectory {
    /// Build a directory over a store handle.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProfileDirectory for StoreProfileDirectory {
    async fn display_name(&self, user: &UserId) -> Option<String> {
        match self.store.get(collections::PROFILES, user.as_str()).await {
            Ok(Some(doc)) => doc
                .fields
                .get("display_name")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            Ok(None) => None,
            Err(e) => {
                debug!(user = %user, error = %e, "[runtime] Profile lookup failed; using raw id");
                None
            }
        }
    }
}
