//! # SM-02 Connection Reconciler
//!
//! Enforces the connection-request state machine between pairs of users and
//! emits the paired side effects: friend record, conversation bootstrap, and
//! notifications.
//!
//! ## Purpose
//!
//! A caller action ("Connect", "Accept", "Reject") invokes the reconciler
//! with two identities; the reconciler reads the current state from the
//! document store, applies the state-machine rule, writes the new state plus
//! any side-effect records, and returns the canonical pair id. Subscribed
//! observers receive changes asynchronously through the store's push feed.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | No self-connections | `domain/invariants.rs` - checked before any write |
//! | INVARIANT-2 | One document per unordered pair | canonical `PairId` as document key |
//! | INVARIANT-3 | Friend record iff some request is accepted | `adapters/reconciler.rs` - created only on the accepted transition |
//! | INVARIANT-4 | Only the original sender re-opens a rejection | `domain/state.rs` - `evaluate_request` |
//! | INVARIANT-5 | Status document is authoritative | side-effect failures logged and swallowed, never unwound |
//!
//! ## State Machine
//!
//! ```text
//! (none) ──request──→ [PENDING] ──accept──→ [ACCEPTED]
//!                         ↑  │
//!                         │  └──reject──→ [REJECTED]
//!                         │                    │
//!                         └── re-open (original sender only) ──┘
//! ```
//!
//! ## Consistency
//!
//! Two simultaneous requests for the same pair are not raced inside this
//! subsystem; they are raced at the store, serialized onto a single document
//! address by the canonical pair id and resolved last-write-wins. A loser's
//! in-memory precondition check may be stale by the time its write lands;
//! this is a best-effort invariant, not a linearizable guarantee. Likewise
//! the friend-record check-then-write on acceptance has a documented race
//! window, because the store offers no cross-document transaction.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! sm-02-connections/
//! ├── domain/
//! │   ├── state.rs         # pure transition rules
//! │   ├── invariants.rs    # precondition checks
//! │   ├── value_objects.rs # RequestContext, Decision
//! │   └── errors.rs        # ConnectionError
//! ├── ports/
//! │   ├── inbound.rs       # ConnectionApi
//! │   └── outbound.rs      # NotificationSink, TimeSource
//! └── adapters/
//!     └── reconciler.rs    # store-backed ConnectionReconciler
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::ConnectionReconciler;
pub use domain::{
    ConnectionError, Decision, RequestAction, RequestContext, ResponseAction,
};
pub use ports::{
    ConnectionApi, ConnectionNotice, NotificationSink, RecordingSink, SinkError, SystemTimeSource,
    TimeSource,
};
