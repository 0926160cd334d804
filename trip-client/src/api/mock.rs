//! Mock trips client for running without the trips service.
//!
//! Serves canned itineraries from a JSON file and keeps confirmed trips
//! in memory, so the whole planner and history flow can be exercised
//! offline.

use std::path::Path;
use std::sync::Arc;

use chrono::SecondsFormat;
use tokio::sync::RwLock;

use crate::domain::{Itinerary, UserId};
use crate::history::{HistoryEntry, HistoryLeg, HistoryUpdate, PAGE_SIZE};
use crate::planner::{Acknowledgement, Confirmation, PlanningQuery};

use super::convert::convert_itineraries;
use super::error::ApiError;
use super::types::WireItinerary;

struct StoredTrip {
    user: UserId,
    entry: HistoryEntry,
    legs: Vec<HistoryLeg>,
}

#[derive(Default)]
struct MockState {
    itineraries: Vec<Itinerary>,
    trips: Vec<StoredTrip>,
    next_id: i64,
}

/// Mock trips client backed by memory.
#[derive(Clone, Default)]
pub struct MockTripsClient {
    state: Arc<RwLock<MockState>>,
}

fn rfc3339(t: &chrono::DateTime<chrono::FixedOffset>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, false)
}

impl MockTripsClient {
    /// Load canned itineraries from a JSON file in the trips API format.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ApiError::Service {
            status: 0,
            message: Some(format!("Failed to read {}: {e}", path.display())),
        })?;
        let trips: Vec<WireItinerary> =
            serde_json::from_str(&json).map_err(|e| ApiError::Json {
                message: format!("Failed to parse {}: {e}", path.display()),
                body: None,
            })?;

        let itineraries = convert_itineraries(&trips).map_err(|e| ApiError::Json {
            message: format!("Failed to convert {}: {e}", path.display()),
            body: None,
        })?;
        Ok(Self::with_itineraries(itineraries))
    }

    /// Serve the given itineraries for every search.
    pub fn with_itineraries(itineraries: Vec<Itinerary>) -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState {
                itineraries,
                trips: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Every search returns the canned itineraries, whatever the query.
    pub async fn get_trips(&self, _query: &PlanningQuery) -> Result<Vec<Itinerary>, ApiError> {
        let state = self.state.read().await;
        if state.itineraries.is_empty() {
            return Err(ApiError::NotFound {
                message: Some("No trips found".to_string()),
            });
        }
        Ok(state.itineraries.clone())
    }

    /// Store the trip and its bus legs as a new history entry.
    pub async fn confirm_trip(
        &self,
        confirmation: &Confirmation,
    ) -> Result<Acknowledgement, ApiError> {
        let mut state = self.state.write().await;
        let history_id = state.next_id.max(1);
        state.next_id = history_id + 1;

        let itinerary = &confirmation.itinerary;
        let legs = itinerary
            .legs
            .iter()
            .filter(|leg| leg.mode.is_bus())
            .enumerate()
            .map(|(i, leg)| HistoryLeg {
                leg_id: Some(history_id * 100 + i as i64),
                bus_route_name: leg.line.as_ref().and_then(|l| l.public_code.clone()),
                from_place: Some(leg.from_place.name.clone()),
                to_place: Some(leg.to_place.name.clone()),
                start_time: leg.aimed_start_time.as_ref().map(rfc3339),
                end_time: leg.aimed_end_time.as_ref().map(rfc3339),
                distance_km: Some(leg.distance_meters / 1000.0),
                duration_minutes: leg.duration_minutes(),
            })
            .collect();

        state.trips.push(StoredTrip {
            user: confirmation.user.clone(),
            entry: HistoryEntry {
                history_id,
                trip_id: Some(rfc3339(&itinerary.aimed_start_time)),
                travel_date: Some(itinerary.aimed_start_time.format("%Y-%m-%d").to_string()),
                notes: None,
                rating: None,
            },
            legs,
        });

        Ok(Acknowledgement {
            message: Some("Trip saved successfully!".to_string()),
        })
    }

    /// A user's history, most recent first.
    pub async fn history(&self, user: &UserId, page: u32) -> Result<Vec<HistoryEntry>, ApiError> {
        let state = self.state.read().await;
        let skip = (page.max(1) as usize - 1) * PAGE_SIZE;
        Ok(state
            .trips
            .iter()
            .rev()
            .filter(|t| &t.user == user)
            .skip(skip)
            .take(PAGE_SIZE)
            .map(|t| t.entry.clone())
            .collect())
    }

    fn not_found(history_id: i64) -> ApiError {
        ApiError::NotFound {
            message: Some(format!("Trip {history_id} not found")),
        }
    }

    pub async fn history_legs(&self, history_id: i64) -> Result<Vec<HistoryLeg>, ApiError> {
        let state = self.state.read().await;
        state
            .trips
            .iter()
            .find(|t| t.entry.history_id == history_id)
            .map(|t| t.legs.clone())
            .ok_or_else(|| Self::not_found(history_id))
    }

    pub async fn update_history(
        &self,
        history_id: i64,
        update: &HistoryUpdate,
    ) -> Result<(), ApiError> {
        let mut state = self.state.write().await;
        let trip = state
            .trips
            .iter_mut()
            .find(|t| t.entry.history_id == history_id)
            .ok_or_else(|| Self::not_found(history_id))?;
        trip.entry.notes = Some(update.notes.clone());
        trip.entry.rating = Some(f64::from(update.rating));
        Ok(())
    }

    pub async fn delete_history(&self, history_id: i64) -> Result<(), ApiError> {
        let mut state = self.state.write().await;
        let before = state.trips.len();
        state.trips.retain(|t| t.entry.history_id != history_id);
        if state.trips.len() == before {
            return Err(Self::not_found(history_id));
        }
        Ok(())
    }
}
