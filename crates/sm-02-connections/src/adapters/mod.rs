//! Adapters: store-backed implementation of the inbound port.

pub mod reconciler;

pub use reconciler::ConnectionReconciler;
