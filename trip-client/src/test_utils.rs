//! Fixtures shared by unit tests.

use chrono::{DateTime, FixedOffset};

use crate::domain::{GeoPoint, Itinerary, Leg, LegMode, Line, Place};
use crate::planner::TripPlanner;

pub fn point(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(lat, lng).unwrap()
}

pub fn ts(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

/// Origin used throughout the tests (Illinois campus).
pub fn origin() -> GeoPoint {
    point(40.1106, -88.2073)
}

pub fn destination() -> GeoPoint {
    point(40.1200, -88.2000)
}

pub fn bus_leg(from: &str, to: &str, meters: f64) -> Leg {
    let mut leg = Leg::new(LegMode::Bus, Place::named(from), Place::named(to), meters);
    leg.duration_secs = Some(600.0);
    leg.line = Some(Line {
        public_code: Some("22".into()),
        name: Some("Illini".into()),
    });
    leg
}

pub fn walk_leg(from: &str, to: &str, meters: f64) -> Leg {
    let mut leg = Leg::new(LegMode::Walk, Place::named(from), Place::named(to), meters);
    leg.duration_secs = Some(meters / 1.4);
    leg
}

/// An itinerary departing and arriving at the given local times on
/// 2024-05-01 (UTC-5).
pub fn itinerary(start: &str, end: &str, legs: Vec<Leg>) -> Itinerary {
    let start = ts(&format!("2024-05-01T{start}:00-05:00"));
    let end = ts(&format!("2024-05-01T{end}:00-05:00"));
    let distance = legs.iter().map(|l| l.distance_meters).sum();
    Itinerary {
        legs,
        duration_secs: Some((end - start).num_seconds() as f64),
        distance_meters: Some(distance),
        aimed_start_time: start,
        aimed_end_time: end,
    }
}

/// A single-bus-leg itinerary with no geometry.
pub fn simple_itinerary(start: &str, end: &str) -> Itinerary {
    itinerary(start, end, vec![bus_leg("Illini Union", "Transit Plaza", 2500.0)])
}

/// A planner with both endpoints, date and time set.
pub fn ready_planner() -> TripPlanner {
    let mut planner = TripPlanner::default();
    planner.pick_point(origin()).unwrap();
    planner.pick_point(destination()).unwrap();
    planner.set_date_input("2024-05-01").unwrap();
    planner.set_time_input("08:00").unwrap();
    planner
}
