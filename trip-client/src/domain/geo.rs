//! Geographic point type.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A WGS84 coordinate pair.
///
/// Produced by map clicks and drags, or by decoding an encoded path.
///
/// # Examples
///
/// ```
/// use trip_client::domain::GeoPoint;
///
/// let p = GeoPoint::new(40.1106, -88.2073).unwrap();
/// assert_eq!(p.to_string(), "40.11060, -88.20730");
///
/// // Latitude beyond the poles is rejected
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !lng.is_finite() || lat.abs() > 90.0 || lng.abs() > 180.0 {
            return Err(DomainError::InvalidCoordinate { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    /// Create a point without range checks.
    ///
    /// Used by the polyline decoder, whose output is bounded by its input.
    pub(crate) fn from_raw(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// The point as a `[lat, lng]` pair, the order map overlays expect.
    pub fn as_lat_lng(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_points() {
        assert!(GeoPoint::new(0.0, 0.0).is_ok());
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn reject_out_of_range() {
        assert!(GeoPoint::new(90.5, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
    }

    #[test]
    fn reject_non_finite() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn display_five_decimals() {
        let p = GeoPoint::new(40.12, -88.2).unwrap();
        assert_eq!(p.to_string(), "40.12000, -88.20000");
    }

    #[test]
    fn lat_lng_order() {
        let p = GeoPoint::new(1.5, 2.5).unwrap();
        assert_eq!(p.as_lat_lng(), [1.5, 2.5]);
    }
}
