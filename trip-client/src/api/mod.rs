//! Client for the trips API.
//!
//! The trips API plans transit trips between two coordinates, records
//! confirmed trips, and serves each user's travel history. It is a plain
//! JSON-over-HTTP service:
//!
//! - `POST /trips/get-trips` returns candidate itineraries, or 404 with a
//!   message when nothing matches
//! - `POST /trips/confirm-trip` records a chosen itinerary
//! - `GET|PATCH|DELETE /trips/history...` manage past trips
//!
//! Failures carry a `{"message": ...}` or `{"error": ...}` body.

mod client;
mod convert;
mod error;
mod mock;
mod service;
mod types;

pub use client::{TripsClient, TripsClientConfig};
pub use convert::{ConversionError, convert_itineraries, convert_itinerary, itinerary_to_wire, parse_timestamp};
pub use error::ApiError;
pub use mock::MockTripsClient;
pub use types::{
    ConfirmRequest, MessageBody, TripRequest, WireItinerary, WireLeg, WireLine, WirePlace,
    WirePoints,
};
