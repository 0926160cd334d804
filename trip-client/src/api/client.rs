//! Trips API HTTP client.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{Itinerary, UserId};
use crate::history::{HistoryEntry, HistoryLeg, HistoryUpdate};
use crate::planner::{Acknowledgement, Confirmation, PlanningQuery};

use super::convert::{convert_itineraries, itinerary_to_wire};
use super::error::ApiError;
use super::types::{ConfirmRequest, MessageBody, TripRequest, WireItinerary};

/// Default base URL, the trips service on a development machine.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Configuration for the trips client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripsClientConfig {
    /// Base URL for the API, without a trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TripsClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl TripsClientConfig {
    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Trips API client.
#[derive(Debug, Clone)]
pub struct TripsClient {
    http: reqwest::Client,
    base_url: String,
}

/// Read a response body, turning error statuses into `ApiError`.
async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageBody>(&body)
            .ok()
            .and_then(MessageBody::text);
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { message });
        }
        return Err(ApiError::Service {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.text().await?)
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}

impl TripsClient {
    /// Create a new trips client with the given configuration.
    pub fn new(config: TripsClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search for trips.
    ///
    /// Returns itineraries in the order the service ranked them. A 404
    /// means no trips matched and is returned as `ApiError::NotFound`.
    pub async fn get_trips(&self, query: &PlanningQuery) -> Result<Vec<Itinerary>, ApiError> {
        let url = format!("{}/trips/get-trips", self.base_url);
        let request = TripRequest {
            start_lat: query.origin.lat,
            start_lon: query.origin.lng,
            end_lat: query.destination.lat,
            end_lon: query.destination.lng,
            datetime: query.depart_at_wire(),
        };

        let response = self.http.post(&url).json(&request).send().await?;
        let body = read_body(response).await?;
        let trips: Vec<WireItinerary> = parse_json(&body)?;
        debug!(count = trips.len(), "trip patterns received");

        convert_itineraries(&trips).map_err(|e| ApiError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// Record a chosen itinerary in the user's history.
    pub async fn confirm_trip(
        &self,
        confirmation: &Confirmation,
    ) -> Result<Acknowledgement, ApiError> {
        let url = format!("{}/trips/confirm-trip", self.base_url);
        let query = &confirmation.query;
        let request = ConfirmRequest {
            user_id: confirmation.user.as_str().to_string(),
            trip: itinerary_to_wire(&confirmation.itinerary),
            start_lat: query.origin.lat,
            start_lon: query.origin.lng,
            end_lat: query.destination.lat,
            end_lon: query.destination.lng,
            datetime: query.depart_at_wire(),
        };

        let response = self.http.post(&url).json(&request).send().await?;
        let body = read_body(response).await?;

        // Any 2xx is a success; the body only carries an optional message.
        let message = serde_json::from_str::<MessageBody>(&body)
            .ok()
            .and_then(MessageBody::text);
        Ok(Acknowledgement { message })
    }

    /// One page (1-based) of a user's travel history.
    pub async fn history(&self, user: &UserId, page: u32) -> Result<Vec<HistoryEntry>, ApiError> {
        let url = format!("{}/trips/history", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("user_id", user.as_str().to_string()), ("page", page.to_string())])
            .send()
            .await?;
        let body = read_body(response).await?;

        parse_json(&body)
    }

    /// The recorded bus legs of a history entry.
    pub async fn history_legs(&self, history_id: i64) -> Result<Vec<HistoryLeg>, ApiError> {
        let url = format!("{}/trips/history/{history_id}/legs", self.base_url);

        let response = self.http.get(&url).send().await?;
        let body = read_body(response).await?;

        parse_json(&body)
    }

    /// Replace the notes and rating of a history entry.
    pub async fn update_history(
        &self,
        history_id: i64,
        update: &HistoryUpdate,
    ) -> Result<(), ApiError> {
        let url = format!("{}/trips/history/{history_id}", self.base_url);

        let response = self.http.patch(&url).json(update).send().await?;
        read_body(response).await?;
        Ok(())
    }

    pub async fn delete_history(&self, history_id: i64) -> Result<(), ApiError> {
        let url = format!("{}/trips/history/{history_id}", self.base_url);

        let response = self.http.delete(&url).send().await?;
        read_body(response).await?;
        Ok(())
    }
}
