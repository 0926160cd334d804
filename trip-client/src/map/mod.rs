//! Map interaction: the two user-picked trip endpoints.

mod controller;

pub use controller::{Endpoint, MapController, PickOutcome};
