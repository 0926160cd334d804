//! Trips API request and response DTOs.
//!
//! Itineraries arrive in the shape of the upstream journey planner:
//! camelCase keys, with most leg fields optional.

use serde::{Deserialize, Serialize};

/// Body of `POST /trips/get-trips`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
    /// Departure, "YYYY-MM-DDTHH:MM:SS"
    pub datetime: String,
}

/// Body of `POST /trips/confirm-trip`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmRequest {
    pub user_id: String,
    pub trip: WireItinerary,
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
    pub datetime: String,
}

/// One candidate trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireItinerary {
    pub aimed_start_time: String,
    pub aimed_end_time: String,
    /// Seconds; sent as null rather than omitted
    #[serde(default)]
    pub duration: Option<f64>,
    /// Meters; sent as null rather than omitted
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub legs: Vec<WireLeg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireLeg {
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aimed_start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aimed_end_time: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub from_place: WirePlace,
    #[serde(default)]
    pub to_place: WirePlace,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<WireLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_on_link: Option<WirePoints>,
    /// Overlay color assigned by the service, e.g. "#FF0000"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WirePlace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireLine {
    #[serde(default)]
    pub public_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WirePoints {
    #[serde(default)]
    pub points: Option<String>,
}

/// Status body: success messages and failures alike.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageBody {
    /// The message, falling back to the error text.
    pub fn text(self) -> Option<String> {
        self.message.or(self.error).filter(|s| !s.is_empty())
    }
}
