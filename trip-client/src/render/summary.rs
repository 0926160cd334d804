//! Text rows describing each leg.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::domain::{Itinerary, Leg, LegMode};

/// Pictogram shown next to a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegIcon {
    Walk,
    Bus,
    Tram,
    Rail,
    Metro,
    Ferry,
    Other,
}

impl LegIcon {
    pub fn for_mode(mode: &LegMode) -> Self {
        match mode {
            LegMode::Walk => LegIcon::Walk,
            LegMode::Bus => LegIcon::Bus,
            LegMode::Tram => LegIcon::Tram,
            LegMode::Rail => LegIcon::Rail,
            LegMode::Metro => LegIcon::Metro,
            LegMode::Water => LegIcon::Ferry,
            LegMode::Other(_) => LegIcon::Other,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            LegIcon::Walk => "🚶",
            LegIcon::Bus => "🚌",
            LegIcon::Tram => "🚊",
            LegIcon::Rail => "🚆",
            LegIcon::Metro => "🚇",
            LegIcon::Ferry => "⛴",
            LegIcon::Other => "•",
        }
    }
}

/// One row of the leg list, ready to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegSummary {
    pub icon: LegIcon,
    pub mode_label: String,
    pub from_name: String,
    pub to_name: String,
    /// Kilometres with one decimal, e.g. "2.5"
    pub distance_km: String,
    /// Minutes with one decimal, or "N/A"
    pub duration_minutes: String,
}

fn mode_label(leg: &Leg) -> String {
    let code = leg.line.as_ref().and_then(|l| l.public_code.as_deref());
    match (&leg.mode, code) {
        (LegMode::Walk, _) => "Walk".to_string(),
        (LegMode::Bus, Some(code)) => format!("Bus {code}"),
        (LegMode::Bus, None) => "Bus".to_string(),
        (LegMode::Tram, Some(code)) => format!("Tram {code}"),
        (LegMode::Tram, None) => "Tram".to_string(),
        (LegMode::Rail, Some(code)) => format!("Train {code}"),
        (LegMode::Rail, None) => "Train".to_string(),
        (LegMode::Metro, Some(code)) => format!("Metro {code}"),
        (LegMode::Metro, None) => "Metro".to_string(),
        (LegMode::Water, _) => "Ferry".to_string(),
        (LegMode::Other(raw), _) => raw.clone(),
    }
}

/// Summarise a leg for the trip list.
pub fn summarize(leg: &Leg) -> LegSummary {
    LegSummary {
        icon: LegIcon::for_mode(&leg.mode),
        mode_label: mode_label(leg),
        from_name: leg.from_place.name.clone(),
        to_name: leg.to_place.name.clone(),
        distance_km: format!("{:.1}", leg.distance_meters / 1000.0),
        duration_minutes: leg
            .duration_minutes()
            .map_or_else(|| "N/A".to_string(), |m| format!("{m:.1}")),
    }
}

/// Wall-clock time as "HH:MM" in the timestamp's own offset.
pub fn format_clock(t: &DateTime<FixedOffset>) -> String {
    t.format("%H:%M").to_string()
}

/// "HH:MM - HH:MM" for a whole trip.
pub fn itinerary_window(itinerary: &Itinerary) -> String {
    format!(
        "{} - {}",
        format_clock(&itinerary.aimed_start_time),
        format_clock(&itinerary.aimed_end_time)
    )
}
