//! Domain types for the trip planner client.
//!
//! These types represent validated trip data as the engine works with it.
//! Wire shapes live in `crate::api`; conversion happens at that boundary,
//! so code receiving these types can trust their validity.

mod departure;
mod error;
mod geo;
mod itinerary;
mod user;

pub use departure::{DATETIME_WIRE_FORMAT, format_depart_at, parse_date, parse_time};
pub use error::DomainError;
pub use geo::GeoPoint;
pub use itinerary::{Itinerary, Leg, LegMode, Line, Place};
pub use user::UserId;
