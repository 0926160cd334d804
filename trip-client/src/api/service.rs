//! The planner and history seams, backed by the real and mock clients.

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::domain::{Itinerary, UserId};
use crate::history::{HistoryEntry, HistoryLeg, HistoryService, HistoryUpdate};
use crate::planner::{
    Acknowledgement, Confirmation, PlanningQuery, RequestFailed, SearchFailed, TripService,
};

use super::client::TripsClient;
use super::error::ApiError;
use super::mock::MockTripsClient;

/// A 404 from the search endpoint means no trips, explained in its body.
fn search_outcome(
    result: Result<Vec<Itinerary>, ApiError>,
) -> Result<Vec<Itinerary>, SearchFailed> {
    result.map_err(|e| match e {
        ApiError::NotFound { message } => SearchFailed::NoTrips { message },
        other => SearchFailed::Request(RequestFailed::from(other)),
    })
}

macro_rules! impl_services {
    ($client:ty) => {
        impl TripService for $client {
            fn search_trips<'a>(
                &'a self,
                query: &'a PlanningQuery,
            ) -> BoxFuture<'a, Result<Vec<Itinerary>, SearchFailed>> {
                async move { search_outcome(self.get_trips(query).await) }.boxed()
            }

            fn confirm_trip<'a>(
                &'a self,
                confirmation: &'a Confirmation,
            ) -> BoxFuture<'a, Result<Acknowledgement, RequestFailed>> {
                async move { Ok(<$client>::confirm_trip(self, confirmation).await?) }.boxed()
            }
        }

        impl HistoryService for $client {
            fn list_history<'a>(
                &'a self,
                user: &'a UserId,
                page: u32,
            ) -> BoxFuture<'a, Result<Vec<HistoryEntry>, RequestFailed>> {
                async move { Ok(self.history(user, page).await?) }.boxed()
            }

            fn history_legs(
                &self,
                history_id: i64,
            ) -> BoxFuture<'_, Result<Vec<HistoryLeg>, RequestFailed>> {
                async move { Ok(<$client>::history_legs(self, history_id).await?) }.boxed()
            }

            fn update_history<'a>(
                &'a self,
                history_id: i64,
                update: &'a HistoryUpdate,
            ) -> BoxFuture<'a, Result<(), RequestFailed>> {
                async move { Ok(<$client>::update_history(self, history_id, update).await?) }
                    .boxed()
            }

            fn delete_history(&self, history_id: i64) -> BoxFuture<'_, Result<(), RequestFailed>> {
                async move { Ok(<$client>::delete_history(self, history_id).await?) }.boxed()
            }
        }
    };
}

impl_services!(TripsClient);
impl_services!(MockTripsClient);
