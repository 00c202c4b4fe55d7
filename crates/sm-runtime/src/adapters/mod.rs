//! Port implementations connecting the subsystems.
//!
//! Each subsystem declares outbound ports for what it needs from the rest
//! of the mesh; the adapters here implement those ports over the concrete
//! services so the subsystem crates stay free of each other.

pub mod notifications;
pub mod profiles;

pub use notifications::{RelayMessageNotifier, RelayNotificationSink, RelaySessionNotifier};
pub use profiles::StoreProfileDirectory;
