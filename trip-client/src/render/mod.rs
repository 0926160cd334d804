//! Turning itineraries into things a user can look at.
//!
//! `overlay` produces the coloured polylines drawn on the map for the
//! selected trip; `summary` produces the per-leg text rows shown in the
//! trip list.

mod overlay;
mod summary;

pub use overlay::{Overlays, PathSegment, SkippedLeg, default_color, overlays, render};
pub use summary::{LegIcon, LegSummary, format_clock, itinerary_window, summarize};
