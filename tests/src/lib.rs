//! # SkillMesh Test Suite
//!
//! Unified test crate for flows that cross subsystem boundaries. Behavior
//! local to one subsystem is tested inside that crate; this suite stands
//! up a whole mesh through the runtime container and exercises the paths
//! a client would actually take.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs       # Connection lifecycle end to end
//!     ├── realtime.rs    # Change-feed subscriptions across subsystems
//!     └── resilience.rs  # Retry behavior under injected store faults
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sm-tests
//!
//! # By category
//! cargo test -p sm-tests integration::flows
//! cargo test -p sm-tests integration::resilience
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
