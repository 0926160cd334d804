//! Conversion between trips API DTOs and domain types.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat};
use tracing::warn;

use crate::domain::{DomainError, GeoPoint, Itinerary, Leg, LegMode, Line, Place};

use super::types::{WireItinerary, WireLeg, WireLine, WirePlace, WirePoints};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("trip pattern {index}: {source}")]
    Pattern {
        index: usize,
        source: Box<ConversionError>,
    },
}

/// Parse an ISO 8601 timestamp.
///
/// A timestamp without an offset is taken as UTC wall time.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, ConversionError> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|_| ConversionError::InvalidTimestamp(s.to_string()))
}

fn parse_optional(s: Option<&str>) -> Result<Option<DateTime<FixedOffset>>, ConversionError> {
    s.map(parse_timestamp).transpose()
}

fn convert_place(place: &WirePlace) -> Result<Place, ConversionError> {
    let coords = match (place.latitude, place.longitude) {
        (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)?),
        _ => None,
    };
    Ok(Place {
        name: place
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown".to_string()),
        coords,
    })
}

fn convert_leg(leg: &WireLeg) -> Result<Leg, ConversionError> {
    Ok(Leg {
        mode: LegMode::parse(&leg.mode),
        mode_name: leg.mode.clone(),
        from_place: convert_place(&leg.from_place)?,
        to_place: convert_place(&leg.to_place)?,
        distance_meters: leg.distance.unwrap_or(0.0),
        duration_secs: leg.duration,
        encoded_path: leg
            .points_on_link
            .as_ref()
            .and_then(|p| p.points.clone())
            .filter(|p| !p.is_empty()),
        color: leg.color.clone().filter(|c| !c.is_empty()),
        line: leg.line.as_ref().map(|l| Line {
            public_code: l.public_code.clone(),
            name: l.name.clone(),
        }),
        aimed_start_time: parse_optional(leg.aimed_start_time.as_deref())?,
        aimed_end_time: parse_optional(leg.aimed_end_time.as_deref())?,
    })
}

/// Convert one trip pattern.
pub fn convert_itinerary(trip: &WireItinerary) -> Result<Itinerary, ConversionError> {
    let legs = trip
        .legs
        .iter()
        .map(convert_leg)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Itinerary {
        legs,
        aimed_start_time: parse_timestamp(&trip.aimed_start_time)?,
        aimed_end_time: parse_timestamp(&trip.aimed_end_time)?,
        duration_secs: trip.duration,
        distance_meters: trip.distance,
    })
}

/// Convert a list of trip patterns, keeping their order.
///
/// The list is all or nothing: one unreadable pattern fails the whole
/// response, since the service ranked the set as a unit.
pub fn convert_itineraries(trips: &[WireItinerary]) -> Result<Vec<Itinerary>, ConversionError> {
    trips
        .iter()
        .enumerate()
        .map(|(index, trip)| {
            convert_itinerary(trip).map_err(|e| {
                warn!(index, error = %e, "unreadable trip pattern");
                ConversionError::Pattern {
                    index,
                    source: Box::new(e),
                }
            })
        })
        .collect()
}

fn timestamp_to_wire(t: &DateTime<FixedOffset>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

fn place_to_wire(place: &Place) -> WirePlace {
    WirePlace {
        name: Some(place.name.clone()),
        latitude: place.coords.map(|c| c.lat),
        longitude: place.coords.map(|c| c.lng),
    }
}

/// Convert an itinerary back to the shape the service sent it in, for
/// confirmation.
pub fn itinerary_to_wire(itinerary: &Itinerary) -> WireItinerary {
    WireItinerary {
        aimed_start_time: timestamp_to_wire(&itinerary.aimed_start_time),
        aimed_end_time: timestamp_to_wire(&itinerary.aimed_end_time),
        duration: itinerary.duration_secs,
        distance: itinerary.distance_meters,
        legs: itinerary
            .legs
            .iter()
            .map(|leg| WireLeg {
                mode: leg.mode_name.clone(),
                aimed_start_time: leg.aimed_start_time.as_ref().map(timestamp_to_wire),
                aimed_end_time: leg.aimed_end_time.as_ref().map(timestamp_to_wire),
                distance: Some(leg.distance_meters),
                duration: leg.duration_secs,
                from_place: place_to_wire(&leg.from_place),
                to_place: place_to_wire(&leg.to_place),
                line: leg.line.as_ref().map(|l| WireLine {
                    public_code: l.public_code.clone(),
                    name: l.name.clone(),
                }),
                points_on_link: leg.encoded_path.as_ref().map(|p| WirePoints {
                    points: Some(p.clone()),
                }),
                color: leg.color.clone(),
            })
            .collect(),
    }
}
