//! # Shared Types Crate
//!
//! Domain entities shared across the SkillMesh subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every record that crosses a subsystem
//!   boundary (connection requests, friends, notifications, conversations,
//!   messages, sessions) is defined here.
//! - **Canonical Pair Identity**: an unordered pair of users maps to exactly
//!   one [`PairId`], regardless of which side derives it. Connection
//!   requests and conversations are keyed by it.
//! - **Plain Documents**: entities are serde structs that round-trip through
//!   the schemaless document store without a custom wire format.

pub mod collections;
pub mod entities;
pub mod pair;
pub mod time;

pub use entities::*;
pub use pair::PairId;
pub use time::{SystemTimeSource, TimeSource};
