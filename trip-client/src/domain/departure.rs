//! Departure date and time handling.
//!
//! The planner form supplies the date (`YYYY-MM-DD`) and time (`HH:MM`)
//! separately. They only become a departure instant once both are set.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::DomainError;

/// Wire format of the departure instant sent to the trips API.
pub const DATETIME_WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a form date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidDate(s.to_string()))
}

/// Parse a form time (`HH:MM`, seconds optional).
pub fn parse_time(s: &str) -> Result<NaiveTime, DomainError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| DomainError::InvalidTime(s.to_string()))
}

/// Format a departure instant for the trips API.
///
/// # Examples
///
/// ```
/// use trip_client::domain::{format_depart_at, parse_date, parse_time};
///
/// let at = parse_date("2024-05-01").unwrap().and_time(parse_time("08:00").unwrap());
/// assert_eq!(format_depart_at(&at), "2024-05-01T08:00:00");
/// ```
pub fn format_depart_at(at: &NaiveDateTime) -> String {
    at.format(DATETIME_WIRE_FORMAT).to_string()
}
