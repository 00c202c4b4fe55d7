//! Cross-subsystem integration tests.

pub mod flows;
pub mod realtime;
pub mod resilience;
