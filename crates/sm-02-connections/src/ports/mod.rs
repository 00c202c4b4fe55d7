//! Ports: the inbound API and the outbound dependencies.

pub mod inbound;
pub mod outbound;

pub use inbound::ConnectionApi;
pub use outbound::{
    ConnectionNotice, NotificationSink, RecordingSink, SinkError, SystemTimeSource, TimeSource,
};
