//! Itinerary and leg types.
//!
//! An `Itinerary` is one candidate trip returned by the trips API: an
//! ordered list of legs, each travelled in a single mode. Itineraries are
//! immutable once received; a new search replaces the whole set.

use std::fmt;

use chrono::{DateTime, FixedOffset};

use super::GeoPoint;

/// Travel mode of a leg.
///
/// The trips API sends the mode as a free-form string. It is parsed once,
/// case-insensitively, so display logic can match exhaustively.
///
/// # Examples
///
/// ```
/// use trip_client::domain::LegMode;
///
/// assert_eq!(LegMode::parse("BUS"), LegMode::Bus);
/// assert_eq!(LegMode::parse("foot"), LegMode::Walk);
/// assert_eq!(LegMode::parse("gondola"), LegMode::Other("gondola".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LegMode {
    Walk,
    Bus,
    Tram,
    Rail,
    Metro,
    Water,
    /// A mode without dedicated handling; keeps the wire value.
    Other(String),
}

impl LegMode {
    /// Parse a wire mode string.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "walk" | "foot" => LegMode::Walk,
            "bus" | "coach" => LegMode::Bus,
            "tram" => LegMode::Tram,
            "rail" | "train" => LegMode::Rail,
            "metro" | "subway" => LegMode::Metro,
            "water" | "ferry" => LegMode::Water,
            _ => LegMode::Other(s.trim().to_string()),
        }
    }

    /// The wire name of this mode.
    pub fn as_str(&self) -> &str {
        match self {
            LegMode::Walk => "foot",
            LegMode::Bus => "bus",
            LegMode::Tram => "tram",
            LegMode::Rail => "rail",
            LegMode::Metro => "metro",
            LegMode::Water => "water",
            LegMode::Other(raw) => raw,
        }
    }

    pub fn is_bus(&self) -> bool {
        matches!(self, LegMode::Bus)
    }
}

impl fmt::Display for LegMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named place at either end of a leg.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub coords: Option<GeoPoint>,
}

impl Place {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coords: None,
        }
    }
}

/// The transit line a leg rides on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    /// Rider-facing route number, e.g. "22"
    pub public_code: Option<String>,
    pub name: Option<String>,
}

/// One contiguous segment of an itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub mode: LegMode,
    /// The mode exactly as the service spelled it, sent back on confirmation
    pub mode_name: String,
    pub from_place: Place,
    pub to_place: Place,
    pub distance_meters: f64,
    /// Duration in seconds, when the service supplied one
    pub duration_secs: Option<f64>,
    /// Geometry in the compact polyline encoding
    pub encoded_path: Option<String>,
    /// Explicit overlay color (e.g. "#FF0000"), overriding the mode default
    pub color: Option<String>,
    pub line: Option<Line>,
    pub aimed_start_time: Option<DateTime<FixedOffset>>,
    pub aimed_end_time: Option<DateTime<FixedOffset>>,
}

impl Leg {
    /// Create a leg with only the required fields set.
    pub fn new(mode: LegMode, from_place: Place, to_place: Place, distance_meters: f64) -> Self {
        Self {
            mode_name: mode.as_str().to_string(),
            mode,
            from_place,
            to_place,
            distance_meters,
            duration_secs: None,
            encoded_path: None,
            color: None,
            line: None,
            aimed_start_time: None,
            aimed_end_time: None,
        }
    }

    /// Duration in minutes. `None` when absent or not a finite number.
    pub fn duration_minutes(&self) -> Option<f64> {
        self.duration_secs
            .filter(|s| s.is_finite())
            .map(|s| s / 60.0)
    }
}

/// A complete candidate trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub legs: Vec<Leg>,
    pub aimed_start_time: DateTime<FixedOffset>,
    pub aimed_end_time: DateTime<FixedOffset>,
    /// Total duration in seconds
    pub duration_secs: Option<f64>,
    /// Total distance in meters
    pub distance_meters: Option<f64>,
}

impl Itinerary {
    /// Whether any leg of the trip rides a bus.
    pub fn has_bus_leg(&self) -> bool {
        self.legs.iter().any(|leg| leg.mode.is_bus())
    }

    /// Sum of the distances of all legs, in meters.
    pub fn leg_distance_meters(&self) -> f64 {
        self.legs.iter().map(|leg| leg.distance_meters).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn itinerary(modes: &[LegMode]) -> Itinerary {
        Itinerary {
            legs: modes
                .iter()
                .map(|m| Leg::new(m.clone(), Place::named("A"), Place::named("B"), 100.0))
                .collect(),
            aimed_start_time: ts("2024-05-01T08:03:00-05:00"),
            aimed_end_time: ts("2024-05-01T08:30:00-05:00"),
            duration_secs: Some(1620.0),
            distance_meters: Some(300.0),
        }
    }

    #[test]
    fn mode_parse_is_case_insensitive() {
        assert_eq!(LegMode::parse("bus"), LegMode::Bus);
        assert_eq!(LegMode::parse("Bus"), LegMode::Bus);
        assert_eq!(LegMode::parse(" WALK "), LegMode::Walk);
        assert_eq!(LegMode::parse("Foot"), LegMode::Walk);
    }

    #[test]
    fn unknown_mode_keeps_raw_value() {
        let mode = LegMode::parse("Cableway");
        assert_eq!(mode, LegMode::Other("Cableway".into()));
        assert_eq!(mode.as_str(), "Cableway");
    }

    #[test]
    fn new_leg_names_its_mode() {
        let leg = Leg::new(LegMode::Walk, Place::named("A"), Place::named("B"), 0.0);
        assert_eq!(leg.mode_name, "foot");
    }

    #[test]
    fn duration_minutes() {
        let mut leg = Leg::new(LegMode::Bus, Place::named("A"), Place::named("B"), 0.0);
        assert_eq!(leg.duration_minutes(), None);

        leg.duration_secs = Some(630.0);
        assert_eq!(leg.duration_minutes(), Some(10.5));

        leg.duration_secs = Some(f64::NAN);
        assert_eq!(leg.duration_minutes(), None);
    }

    #[test]
    fn bus_leg_detection() {
        assert!(itinerary(&[LegMode::Walk, LegMode::Bus]).has_bus_leg());
        assert!(!itinerary(&[LegMode::Walk, LegMode::Rail]).has_bus_leg());
    }

    #[test]
    fn leg_distance_sum() {
        assert_eq!(
            itinerary(&[LegMode::Walk, LegMode::Bus, LegMode::Walk]).leg_distance_meters(),
            300.0
        );
    }
}
