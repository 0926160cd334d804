//! Map overlays for an itinerary.

use serde::Serialize;
use tracing::warn;

use crate::domain::{GeoPoint, Itinerary, Leg, LegMode};
use crate::polyline::{self, MalformedPath};

/// One drawable polyline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSegment {
    /// Position of the leg within its itinerary
    pub leg_index: usize,
    pub geometry: Vec<GeoPoint>,
    pub color: String,
}

/// The overlay color used when a leg does not carry one.
pub fn default_color(mode: &LegMode) -> &'static str {
    match mode {
        LegMode::Bus => "blue",
        LegMode::Walk
        | LegMode::Tram
        | LegMode::Rail
        | LegMode::Metro
        | LegMode::Water
        | LegMode::Other(_) => "black",
    }
}

fn segment(leg_index: usize, leg: &Leg, encoded: &str) -> Result<PathSegment, MalformedPath> {
    let geometry = polyline::decode(encoded)?;
    let color = leg
        .color
        .clone()
        .unwrap_or_else(|| default_color(&leg.mode).to_string());
    Ok(PathSegment {
        leg_index,
        geometry,
        color,
    })
}

/// Decode every leg that carries a path, in leg order.
///
/// Legs without a path are skipped. Nothing is decoded until the iterator
/// is advanced.
pub fn render(
    itinerary: &Itinerary,
) -> impl Iterator<Item = Result<PathSegment, MalformedPath>> + '_ {
    itinerary
        .legs
        .iter()
        .enumerate()
        .filter_map(|(i, leg)| {
            leg.encoded_path
                .as_deref()
                .map(|encoded| segment(i, leg, encoded))
        })
}

/// A leg whose path could not be decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLeg {
    pub leg_index: usize,
    pub reason: String,
}

/// Everything to draw for one itinerary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overlays {
    pub segments: Vec<PathSegment>,
    pub skipped: Vec<SkippedLeg>,
}

impl Overlays {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Collect the drawable segments of an itinerary.
///
/// A leg with a malformed path is left off the map and recorded in
/// `skipped`; it is never drawn with partial geometry.
pub fn overlays(itinerary: &Itinerary) -> Overlays {
    let mut out = Overlays::default();
    let with_path = itinerary
        .legs
        .iter()
        .enumerate()
        .filter(|(_, leg)| leg.encoded_path.is_some())
        .map(|(i, _)| i);

    for (leg_index, rendered) in with_path.zip(render(itinerary)) {
        match rendered {
            Ok(segment) => out.segments.push(segment),
            Err(e) => {
                warn!(leg = leg_index, error = %e, "skipping leg with undecodable path");
                out.skipped.push(SkippedLeg {
                    leg_index,
                    reason: e.to_string(),
                });
            }
        }
    }
    out
}
