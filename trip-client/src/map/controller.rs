//! Origin/destination point selection.
//!
//! Clicks fill the origin first, then the destination. Once both are set,
//! further clicks are ignored until one is cleared; dragging a marker
//! always moves it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::GeoPoint;

/// Which of the two trip endpoints an action refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Origin,
    Destination,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Origin => "origin",
            Endpoint::Destination => "destination",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "origin" | "start" => Ok(Endpoint::Origin),
            "destination" | "end" => Ok(Endpoint::Destination),
            other => Err(format!("unknown endpoint: {other}")),
        }
    }
}

/// What a map click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PickOutcome {
    /// The click set this endpoint
    Set(Endpoint),
    /// Both endpoints were already set
    Ignored,
}

/// The origin and destination markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapController {
    origin: Option<GeoPoint>,
    destination: Option<GeoPoint>,
}

impl MapController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.origin
    }

    pub fn destination(&self) -> Option<GeoPoint> {
        self.destination
    }

    pub fn get(&self, which: Endpoint) -> Option<GeoPoint> {
        match which {
            Endpoint::Origin => self.origin,
            Endpoint::Destination => self.destination,
        }
    }

    /// Both endpoints, once both are set.
    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        Some((self.origin?, self.destination?))
    }

    /// Record a map click.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_client::domain::GeoPoint;
    /// use trip_client::map::{Endpoint, MapController, PickOutcome};
    ///
    /// let mut map = MapController::new();
    /// let p = GeoPoint::new(40.0, -88.0).unwrap();
    ///
    /// assert_eq!(map.pick(p), PickOutcome::Set(Endpoint::Origin));
    /// assert_eq!(map.pick(p), PickOutcome::Set(Endpoint::Destination));
    /// assert_eq!(map.pick(p), PickOutcome::Ignored);
    /// ```
    pub fn pick(&mut self, point: GeoPoint) -> PickOutcome {
        if self.origin.is_none() {
            self.origin = Some(point);
            PickOutcome::Set(Endpoint::Origin)
        } else if self.destination.is_none() {
            self.destination = Some(point);
            PickOutcome::Set(Endpoint::Destination)
        } else {
            PickOutcome::Ignored
        }
    }

    /// Move an existing marker.
    ///
    /// Returns whether the stored coordinate changed. Dragging a marker
    /// that isn't on the map does nothing.
    pub fn drag(&mut self, which: Endpoint, point: GeoPoint) -> bool {
        let slot = self.slot_mut(which);
        match slot {
            Some(current) if *current != point => {
                *current = point;
                true
            }
            _ => false,
        }
    }

    /// Remove one marker. Returns whether it was set.
    pub fn clear(&mut self, which: Endpoint) -> bool {
        self.slot_mut(which).take().is_some()
    }

    /// Remove both markers.
    pub fn clear_all(&mut self) {
        self.origin = None;
        self.destination = None;
    }

    fn slot_mut(&mut self, which: Endpoint) -> &mut Option<GeoPoint> {
        match which {
            Endpoint::Origin => &mut self.origin,
            Endpoint::Destination => &mut self.destination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    #[test]
    fn three_picks_fill_origin_then_destination() {
        let mut map = MapController::new();
        let a = pt(40.1106, -88.2073);
        let b = pt(40.1200, -88.2000);
        let c = pt(40.1300, -88.1900);

        assert_eq!(map.pick(a), PickOutcome::Set(Endpoint::Origin));
        assert_eq!(map.pick(b), PickOutcome::Set(Endpoint::Destination));
        assert_eq!(map.pick(c), PickOutcome::Ignored);

        assert_eq!(map.origin(), Some(a));
        assert_eq!(map.destination(), Some(b));
    }

    #[test]
    fn pick_refills_cleared_origin_first() {
        let mut map = MapController::new();
        map.pick(pt(1.0, 1.0));
        map.pick(pt(2.0, 2.0));
        assert!(map.clear(Endpoint::Origin));

        assert_eq!(map.pick(pt(3.0, 3.0)), PickOutcome::Set(Endpoint::Origin));
        assert_eq!(map.origin(), Some(pt(3.0, 3.0)));
        assert_eq!(map.destination(), Some(pt(2.0, 2.0)));
    }

    #[test]
    fn drag_overwrites_existing_marker() {
        let mut map = MapController::new();
        map.pick(pt(1.0, 1.0));
        map.pick(pt(2.0, 2.0));

        assert!(map.drag(Endpoint::Origin, pt(1.5, 1.5)));
        assert_eq!(map.origin(), Some(pt(1.5, 1.5)));
        assert!(map.drag(Endpoint::Destination, pt(2.5, 2.5)));
        assert_eq!(map.destination(), Some(pt(2.5, 2.5)));
    }

    #[test]
    fn drag_to_same_place_reports_no_change() {
        let mut map = MapController::new();
        map.pick(pt(1.0, 1.0));
        assert!(!map.drag(Endpoint::Origin, pt(1.0, 1.0)));
    }

    #[test]
    fn drag_of_unset_marker_is_ignored() {
        let mut map = MapController::new();
        assert!(!map.drag(Endpoint::Destination, pt(1.0, 1.0)));
        assert_eq!(map.destination(), None);
    }

    #[test]
    fn clear_resets_exactly_one_endpoint() {
        let mut map = MapController::new();
        map.pick(pt(1.0, 1.0));
        map.pick(pt(2.0, 2.0));

        assert!(map.clear(Endpoint::Destination));
        assert_eq!(map.origin(), Some(pt(1.0, 1.0)));
        assert_eq!(map.destination(), None);
        assert!(!map.clear(Endpoint::Destination));
    }

    #[test]
    fn endpoints_requires_both() {
        let mut map = MapController::new();
        assert!(map.endpoints().is_none());
        map.pick(pt(1.0, 1.0));
        assert!(map.endpoints().is_none());
        map.pick(pt(2.0, 2.0));
        assert_eq!(map.endpoints(), Some((pt(1.0, 1.0), pt(2.0, 2.0))));
    }

    #[test]
    fn endpoint_from_str() {
        assert_eq!("origin".parse::<Endpoint>(), Ok(Endpoint::Origin));
        assert_eq!("End".parse::<Endpoint>(), Ok(Endpoint::Destination));
        assert!("middle".parse::<Endpoint>().is_err());
    }
}
