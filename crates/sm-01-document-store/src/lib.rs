//! # SM-01 Document Store
//!
//! Port and adapters for the networked, schemaless document database every
//! SkillMesh subsystem persists through.
//!
//! ## Purpose
//!
//! The real persistence and fan-out mechanism is an external hosted service.
//! This crate defines the boundary the core code programs against:
//!
//! - [`DocumentStore`] - async CRUD + query port
//! - [`ChangeSubscription`] / [`ChangeStream`] - push-based change feed per
//!   query, at-least-once delivery
//! - [`RetryPolicy`] / [`RetryingStore`] - one configurable retry policy
//!   applied uniformly at the client boundary instead of ad hoc sleeps at
//!   call sites
//! - [`InMemoryStore`] - single-process adapter with fault injection, used
//!   by tests and local development
//!
//! ## Consistency model
//!
//! The store offers last-write-wins per document and no cross-document
//! transactions. Callers that need idempotency derive deterministic document
//! ids (see `shared-types::PairId`) so concurrent writers collide on one
//! address rather than creating siblings.
//!
//! ## Module Structure
//!
//! ```text
//! sm-01-document-store/
//! ├── document.rs      # Document, Fields, encode/decode helpers
//! ├── query.rs         # Filter, Ordering, Query
//! ├── port.rs          # DocumentStore trait
//! ├── subscription.rs  # DocumentChange, ChangeSubscription, ChangeStream
//! ├── retry.rs         # Backoff, RetryPolicy, RetryingStore
//! ├── memory.rs        # InMemoryStore adapter
//! └── error.rs         # StoreError
//! ```

pub mod document;
pub mod error;
pub mod memory;
pub mod port;
pub mod query;
pub mod retry;
pub mod subscription;

pub use document::{fields_of, Document, Fields};
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use port::DocumentStore;
pub use query::{Direction, Filter, Ordering, Query};
pub use retry::{Backoff, RetryPolicy, RetryingStore};
pub use subscription::{ChangeStream, ChangeSubscription, DocumentChange};

/// Maximum change events buffered per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
