//! Polyline encoding.

use crate::domain::GeoPoint;

use super::{ASCII_OFFSET, CONTINUATION, GROUP_MASK, PRECISION};

/// Encode coordinates as a polyline.
///
/// Coordinates are rounded to five decimal places.
///
/// # Examples
///
/// ```
/// use trip_client::domain::GeoPoint;
/// use trip_client::polyline::encode;
///
/// let points = [
///     GeoPoint::new(38.5, -120.2).unwrap(),
///     GeoPoint::new(40.7, -120.95).unwrap(),
///     GeoPoint::new(43.252, -126.453).unwrap(),
/// ];
/// assert_eq!(encode(&points), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
/// ```
pub fn encode(points: &[GeoPoint]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = scale(point.lat);
        let lng = scale(point.lng);
        push_delta(&mut out, lat - prev_lat);
        push_delta(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn scale(coord: f64) -> i64 {
    (coord * PRECISION).round() as i64
}

fn push_delta(out: &mut String, delta: i64) {
    let mut value = if delta < 0 {
        !((delta as u64) << 1)
    } else {
        (delta as u64) << 1
    };

    while value >= CONTINUATION {
        out.push(char::from(
            ((CONTINUATION | (value & GROUP_MASK)) as u8) + ASCII_OFFSET,
        ));
        value >>= 5;
    }
    out.push(char::from(value as u8 + ASCII_OFFSET));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyline::decode;

    #[test]
    fn encode_empty() {
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn encode_origin() {
        assert_eq!(encode(&[GeoPoint::new(0.0, 0.0).unwrap()]), "??");
    }

    #[test]
    fn encode_rounds_to_five_decimals() {
        let precise = GeoPoint::new(40.110_604, -88.207_296).unwrap();
        let rounded = GeoPoint::new(40.110_60, -88.207_30).unwrap();
        assert_eq!(encode(&[precise]), encode(&[rounded]));
    }

    #[test]
    fn roundtrip_campus_route() {
        let points = vec![
            GeoPoint::new(40.1106, -88.2073).unwrap(),
            GeoPoint::new(40.1150, -88.2050).unwrap(),
            GeoPoint::new(40.1200, -88.2000).unwrap(),
        ];
        assert_eq!(decode(&encode(&points)).unwrap(), points);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::polyline::decode;
    use proptest::prelude::*;

    /// Strategy for points with exactly five decimal places.
    fn five_decimal_point() -> impl Strategy<Value = GeoPoint> {
        (-9_000_000i64..=9_000_000, -18_000_000i64..=18_000_000)
            .prop_map(|(lat, lng)| GeoPoint::from_raw(lat as f64 / 1e5, lng as f64 / 1e5))
    }

    proptest! {
        /// decode(encode(points)) reproduces the points
        #[test]
        fn roundtrip(points in prop::collection::vec(five_decimal_point(), 0..40)) {
            let decoded = decode(&encode(&points)).unwrap();
            prop_assert_eq!(decoded, points);
        }

        /// Encoded output always stays inside the printable alphabet
        #[test]
        fn output_is_printable(points in prop::collection::vec(five_decimal_point(), 0..40)) {
            let encoded = encode(&points);
            prop_assert!(encoded.bytes().all(|b| (63..=126).contains(&b)));
        }

        /// Any prefix that cuts a point short is rejected, never half-decoded
        #[test]
        fn truncation_never_yields_garbage(points in prop::collection::vec(five_decimal_point(), 1..10), cut in 1usize..8) {
            let encoded = encode(&points);
            let end = encoded.len().saturating_sub(cut);
            match decode(&encoded[..end]) {
                Ok(prefix) => {
                    prop_assert!(prefix.len() < points.len());
                    prop_assert_eq!(&prefix[..], &points[..prefix.len()]);
                }
                Err(_) => {}
            }
        }
    }
}
