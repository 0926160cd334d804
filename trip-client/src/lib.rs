//! Browser client for a transit trip planner.
//!
//! Users pick a start and end on a map, choose a departure time, and get
//! candidate itineraries from a trips API. Each itinerary can be inspected
//! leg by leg, drawn on the map from its encoded polylines, and confirmed
//! into the user's travel history.

pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod history;
pub mod logging;
pub mod map;
pub mod planner;
pub mod polyline;
pub mod render;
pub mod session;
pub mod web;

#[cfg(test)]
pub mod test_utils;
