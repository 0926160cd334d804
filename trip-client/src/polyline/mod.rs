//! Encoded polyline codec.
//!
//! Leg geometries arrive in the Google polyline encoding at precision
//! 1e5: each coordinate delta is zigzag-encoded, split into 5-bit groups
//! (little-endian, continuation bit `0x20`) and offset into printable
//! ASCII by `+63`. Latitude and longitude deltas alternate strictly.

mod decode;
mod encode;

pub use decode::{MalformedPath, decode};
pub use encode::encode;

/// Coordinate scale factor (five decimal places).
const PRECISION: f64 = 1e5;

/// Offset added to every 5-bit group to land in printable ASCII.
const ASCII_OFFSET: u8 = 63;

/// Continuation flag within a group.
const CONTINUATION: u64 = 0x20;

/// Payload mask within a group.
const GROUP_MASK: u64 = 0x1f;
