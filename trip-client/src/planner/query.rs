//! Queries, tickets and confirmations.

use std::fmt;

use chrono::NaiveDateTime;

use crate::domain::{GeoPoint, Itinerary, UserId, format_depart_at};

/// A complete, issuable trip query.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningQuery {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub depart_at: NaiveDateTime,
}

impl PlanningQuery {
    /// Departure instant in the trips API format.
    pub fn depart_at_wire(&self) -> String {
        format_depart_at(&self.depart_at)
    }
}

/// Identifies one request issued by the planner.
///
/// Ids increase monotonically per planner; only the most recent one of
/// each kind is ever current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handed out when a search starts. Completing with a stale id is a no-op.
#[derive(Debug, Clone)]
pub struct QueryTicket {
    pub id: RequestId,
    pub query: PlanningQuery,
}

/// Everything the trips API needs to record a chosen trip.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub user: UserId,
    /// The query that produced the candidate set
    pub query: PlanningQuery,
    pub itinerary: Itinerary,
}

/// Handed out when a confirmation starts.
#[derive(Debug, Clone)]
pub struct ConfirmTicket {
    pub id: RequestId,
    pub confirmation: Confirmation,
}

/// The service's reply to a successful confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Acknowledgement {
    pub message: Option<String>,
}
