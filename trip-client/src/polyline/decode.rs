//! Polyline decoding.

use crate::domain::GeoPoint;

use super::{ASCII_OFFSET, CONTINUATION, GROUP_MASK, PRECISION};

/// Error returned when an encoded path cannot be decoded.
///
/// Decoding never emits a partial or guessed geometry: any structural
/// problem in the input fails the whole path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed path at byte {offset}: {reason}")]
pub struct MalformedPath {
    /// Byte offset where decoding failed
    pub offset: usize,
    pub reason: &'static str,
}

/// Largest shift that still leaves room for a 5-bit group in a `u64`.
const MAX_SHIFT: u32 = 60;

/// Decode an encoded polyline into coordinates.
///
/// # Examples
///
/// ```
/// use trip_client::polyline::decode;
///
/// let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
/// assert_eq!(points.len(), 3);
/// assert_eq!((points[0].lat, points[0].lng), (38.5, -120.2));
///
/// assert!(decode("").unwrap().is_empty());
///
/// // Ends inside a group
/// assert!(decode("_p~iF~ps|").is_err());
/// ```
pub fn decode(encoded: &str) -> Result<Vec<GeoPoint>, MalformedPath> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        lat += next_delta(bytes, &mut index)?;

        if index >= bytes.len() {
            return Err(MalformedPath {
                offset: index,
                reason: "latitude without matching longitude",
            });
        }
        lng += next_delta(bytes, &mut index)?;

        points.push(GeoPoint::from_raw(
            lat as f64 / PRECISION,
            lng as f64 / PRECISION,
        ));
    }

    Ok(points)
}

/// Read one zigzag-encoded delta starting at `index`, advancing past it.
fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64, MalformedPath> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(MalformedPath {
                offset: *index,
                reason: "input ends inside a group",
            });
        };

        if !(ASCII_OFFSET..=ASCII_OFFSET + 63).contains(&byte) {
            return Err(MalformedPath {
                offset: *index,
                reason: "byte outside the encoding alphabet",
            });
        }

        if shift > MAX_SHIFT {
            return Err(MalformedPath {
                offset: *index,
                reason: "group run too long",
            });
        }

        let group = u64::from(byte - ASCII_OFFSET);
        result |= (group & GROUP_MASK) << shift;
        shift += 5;
        *index += 1;

        if group < CONTINUATION {
            break;
        }
    }

    let magnitude = (result >> 1) as i64;
    Ok(if result & 1 == 1 { !magnitude } else { magnitude })
}
