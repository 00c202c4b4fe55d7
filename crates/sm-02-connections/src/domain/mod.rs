//! Domain layer: pure state-machine rules, invariants and errors.

pub mod errors;
pub mod invariants;
pub mod state;
pub mod value_objects;

pub use errors::ConnectionError;
pub use state::{evaluate_request, evaluate_response, RequestAction, ResponseAction};
pub use value_objects::{Decision, RequestContext};
