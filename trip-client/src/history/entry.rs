//! History records as served by the trips API.

use serde::{Deserialize, Serialize};

/// One confirmed trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub history_id: i64,
    /// Departure instant of the trip, as an ISO 8601 string
    pub trip_id: Option<String>,
    /// Travel date, "YYYY-MM-DD"
    pub travel_date: Option<String>,
    pub notes: Option<String>,
    pub rating: Option<f64>,
}

impl HistoryEntry {
    /// Departure time as "HH:MM", or "N/A".
    pub fn start_clock(&self) -> String {
        format_wire_clock(self.trip_id.as_deref())
    }

    /// The stored rating as a whole number of stars, 0 when unrated.
    pub fn stars(&self) -> u8 {
        self.rating
            .filter(|r| r.is_finite())
            .map_or(0, |r| r.round().clamp(0.0, 5.0) as u8)
    }
}

/// One bus leg of a confirmed trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryLeg {
    pub leg_id: Option<i64>,
    pub bus_route_name: Option<String>,
    pub from_place: Option<String>,
    pub to_place: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,
}

/// A history leg formatted for the leg table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegRow {
    pub route: String,
    pub from: String,
    pub to: String,
    pub start: String,
    pub end: String,
    pub distance_km: String,
    pub duration_minutes: String,
}

fn or_unknown(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "Unknown".to_string(),
    }
}

impl HistoryLeg {
    pub fn row(&self) -> LegRow {
        LegRow {
            route: or_unknown(self.bus_route_name.as_deref()),
            from: or_unknown(self.from_place.as_deref()),
            to: or_unknown(self.to_place.as_deref()),
            start: format_wire_clock(self.start_time.as_deref()),
            end: format_wire_clock(self.end_time.as_deref()),
            distance_km: self
                .distance_km
                .filter(|d| d.is_finite())
                .map_or_else(|| "0.0".to_string(), |d| format!("{d:.1}")),
            duration_minutes: self
                .duration_minutes
                .filter(|d| d.is_finite())
                .map_or_else(|| "N/A".to_string(), |d| format!("{d:.1}")),
        }
    }
}

/// The editable part of a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryUpdate {
    pub notes: String,
    pub rating: u8,
}

/// "HH:MM" from an ISO 8601 timestamp string, or "N/A".
///
/// The clock is read straight from the string so the time is shown in
/// whatever offset the service recorded it.
pub fn format_wire_clock(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(|s| s.get(11..16))
        .filter(|hhmm| hhmm.as_bytes().get(2) == Some(&b':'))
        .map_or_else(|| "N/A".to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_from_wire_timestamp() {
        assert_eq!(
            format_wire_clock(Some("2024-05-01T08:03:00-05:00")),
            "08:03"
        );
        assert_eq!(format_wire_clock(Some("2024-05-01")), "N/A");
        assert_eq!(format_wire_clock(Some("")), "N/A");
        assert_eq!(format_wire_clock(None), "N/A");
    }

    #[test]
    fn leg_row_defaults() {
        let row = HistoryLeg::default().row();
        assert_eq!(row.route, "Unknown");
        assert_eq!(row.from, "Unknown");
        assert_eq!(row.to, "Unknown");
        assert_eq!(row.start, "N/A");
        assert_eq!(row.end, "N/A");
        assert_eq!(row.distance_km, "0.0");
        assert_eq!(row.duration_minutes, "N/A");
    }

    #[test]
    fn leg_row_values() {
        let leg = HistoryLeg {
            leg_id: Some(3),
            bus_route_name: Some("22".into()),
            from_place: Some("Illini Union".into()),
            to_place: Some("Transit Plaza".into()),
            start_time: Some("2024-05-01T08:05:00-05:00".into()),
            end_time: Some("2024-05-01T08:15:00-05:00".into()),
            distance_km: Some(2.5),
            duration_minutes: Some(10.0),
        };
        let row = leg.row();
        assert_eq!(row.route, "22");
        assert_eq!(row.start, "08:05");
        assert_eq!(row.end, "08:15");
        assert_eq!(row.distance_km, "2.5");
        assert_eq!(row.duration_minutes, "10.0");
    }

    #[test]
    fn wire_shape() {
        let json = r#"{"historyId":4,"tripId":"2024-05-01T08:03:00","travelDate":"2024-05-01","notes":null,"rating":3.6}"#;
        let entry: HistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.history_id, 4);
        assert_eq!(entry.start_clock(), "08:03");
        assert_eq!(entry.stars(), 4);
    }

    #[test]
    fn unrated_is_zero_stars() {
        let entry = HistoryEntry {
            history_id: 1,
            trip_id: None,
            travel_date: None,
            notes: None,
            rating: None,
        };
        assert_eq!(entry.stars(), 0);
        assert_eq!(entry.start_clock(), "N/A");
    }
}
