//! The planner state machine.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::debug;

use crate::domain::{GeoPoint, Itinerary, parse_date, parse_time};
use crate::map::{Endpoint, MapController, PickOutcome};
use crate::session::SessionContext;

use super::config::PlannerConfig;
use super::error::{PlanningError, QueryField, RequestFailed, SearchFailed};
use super::query::{
    Acknowledgement, ConfirmTicket, Confirmation, PlanningQuery, QueryTicket, RequestId,
};

/// Coarse phase of the planner, for display and affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Idle,
    Querying,
    Results,
    Selected,
    Confirming,
}

/// Why a search produced no candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum SearchMessage {
    /// The search succeeded and found nothing
    NoTrips(String),
    /// The search failed
    Failed(String),
}

impl SearchMessage {
    pub fn text(&self) -> &str {
        match self {
            SearchMessage::NoTrips(text) | SearchMessage::Failed(text) => text,
        }
    }
}

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A one-off message about the last action (e.g. confirmation result).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Result of applying a search response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The response became the current candidate set
    Applied { candidates: usize },
    /// The request had been superseded; the response was dropped
    Stale,
}

/// Result of applying a confirmation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Trip recorded; the planner has been reset
    Confirmed,
    /// The service refused; the selection is intact
    Failed,
    /// The confirmation had been abandoned; the response was dropped
    Stale,
}

/// A received candidate set and the query that produced it.
#[derive(Debug, Clone)]
struct Candidates {
    query: PlanningQuery,
    itineraries: Vec<Itinerary>,
    message: Option<SearchMessage>,
    /// Candidate whose leg list is expanded
    expanded: Option<usize>,
}

impl Candidates {
    fn check_index(&self, index: usize) -> Result<(), PlanningError> {
        if index < self.itineraries.len() {
            Ok(())
        } else {
            Err(PlanningError::NoSuchCandidate {
                index,
                count: self.itineraries.len(),
            })
        }
    }
}

/// The current phase, carrying exactly the data that phase needs.
#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Querying {
        request: RequestId,
        query: PlanningQuery,
    },
    Results(Candidates),
    Selected {
        candidates: Candidates,
        index: usize,
    },
    Confirming {
        request: RequestId,
        candidates: Candidates,
        index: usize,
    },
}

/// Trip-planning state for one user session.
///
/// All transitions are synchronous. Requests are started with
/// [`begin_query`](Self::begin_query) / [`begin_confirm`](Self::begin_confirm)
/// and finished with the matching `complete_*` call once the network
/// answers; see [`run_search`](super::run_search) for the async glue.
#[derive(Debug, Clone)]
pub struct TripPlanner {
    config: Arc<PlannerConfig>,
    map: MapController,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    phase: Phase,
    notice: Option<Notice>,
    last_request: u64,
}

impl Default for TripPlanner {
    fn default() -> Self {
        Self::new(Arc::new(PlannerConfig::default()))
    }
}

impl TripPlanner {
    pub fn new(config: Arc<PlannerConfig>) -> Self {
        Self {
            config,
            map: MapController::new(),
            date: None,
            time: None,
            phase: Phase::Idle,
            notice: None,
            last_request: 0,
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn phase(&self) -> PhaseKind {
        match self.phase {
            Phase::Idle => PhaseKind::Idle,
            Phase::Querying { .. } => PhaseKind::Querying,
            Phase::Results(_) => PhaseKind::Results,
            Phase::Selected { .. } => PhaseKind::Selected,
            Phase::Confirming { .. } => PhaseKind::Confirming,
        }
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.map.origin()
    }

    pub fn destination(&self) -> Option<GeoPoint> {
        self.map.destination()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    /// Candidates of the most recent search, in server order.
    pub fn candidates(&self) -> &[Itinerary] {
        self.candidate_set()
            .map(|c| c.itineraries.as_slice())
            .unwrap_or(&[])
    }

    /// Message explaining an empty candidate set.
    pub fn search_message(&self) -> Option<&SearchMessage> {
        self.candidate_set().and_then(|c| c.message.as_ref())
    }

    pub fn selected_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Selected { index, .. } | Phase::Confirming { index, .. } => Some(index),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&Itinerary> {
        let index = self.selected_index()?;
        self.candidates().get(index)
    }

    /// Candidate whose leg details are expanded.
    pub fn expanded_index(&self) -> Option<usize> {
        self.candidate_set().and_then(|c| c.expanded)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Query parameters that still need a value.
    pub fn missing_fields(&self) -> Vec<QueryField> {
        let mut missing = Vec::new();
        if self.map.origin().is_none() {
            missing.push(QueryField::Origin);
        }
        if self.map.destination().is_none() {
            missing.push(QueryField::Destination);
        }
        if self.date.is_none() {
            missing.push(QueryField::Date);
        }
        if self.time.is_none() {
            missing.push(QueryField::Time);
        }
        missing
    }

    /// Whether "find trips" is available.
    pub fn can_search(&self) -> bool {
        !matches!(self.phase, Phase::Confirming { .. }) && self.missing_fields().is_empty()
    }

    /// Whether "confirm trip" is available.
    pub fn can_confirm(&self) -> bool {
        matches!(self.phase, Phase::Selected { .. })
    }

    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            Phase::Querying { .. } | Phase::Confirming { .. }
        )
    }

    fn candidate_set(&self) -> Option<&Candidates> {
        match &self.phase {
            Phase::Results(candidates)
            | Phase::Selected { candidates, .. }
            | Phase::Confirming { candidates, .. } => Some(candidates),
            Phase::Idle | Phase::Querying { .. } => None,
        }
    }

    fn candidate_set_mut(&mut self) -> Option<&mut Candidates> {
        match &mut self.phase {
            Phase::Results(candidates)
            | Phase::Selected { candidates, .. }
            | Phase::Confirming { candidates, .. } => Some(candidates),
            Phase::Idle | Phase::Querying { .. } => None,
        }
    }

    // ------------------------------------------------------------------
    // Query parameter edits
    // ------------------------------------------------------------------

    /// Record a map click.
    pub fn pick_point(&mut self, point: GeoPoint) -> Result<PickOutcome, PlanningError> {
        self.begin_edit()?;
        let outcome = self.map.pick(point);
        if let PickOutcome::Set(which) = outcome {
            debug!(%which, %point, "endpoint picked");
            self.invalidate_candidates();
        }
        Ok(outcome)
    }

    /// Move an existing marker. Candidates for the old position are dropped.
    pub fn drag_point(&mut self, which: Endpoint, point: GeoPoint) -> Result<bool, PlanningError> {
        self.begin_edit()?;
        let moved = self.map.drag(which, point);
        if moved {
            debug!(%which, %point, "endpoint dragged");
            self.invalidate_candidates();
        }
        Ok(moved)
    }

    /// Remove one marker. Candidates for the old endpoint are dropped.
    pub fn clear_point(&mut self, which: Endpoint) -> Result<bool, PlanningError> {
        self.begin_edit()?;
        let cleared = self.map.clear(which);
        if cleared {
            debug!(%which, "endpoint cleared");
            self.invalidate_candidates();
        }
        Ok(cleared)
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) -> Result<(), PlanningError> {
        self.begin_edit()?;
        if self.date != date {
            self.date = date;
            self.invalidate_candidates();
        }
        Ok(())
    }

    pub fn set_time(&mut self, time: Option<NaiveTime>) -> Result<(), PlanningError> {
        self.begin_edit()?;
        if self.time != time {
            self.time = time;
            self.invalidate_candidates();
        }
        Ok(())
    }

    /// Set the date from a form value. An empty value clears it.
    pub fn set_date_input(&mut self, input: &str) -> Result<(), PlanningError> {
        let date = match input.trim() {
            "" => None,
            s => Some(parse_date(s)?),
        };
        self.set_date(date)
    }

    /// Set the time from a form value. An empty value clears it.
    pub fn set_time_input(&mut self, input: &str) -> Result<(), PlanningError> {
        let time = match input.trim() {
            "" => None,
            s => Some(parse_time(s)?),
        };
        self.set_time(time)
    }

    fn begin_edit(&mut self) -> Result<(), PlanningError> {
        if matches!(self.phase, Phase::Confirming { .. }) {
            return Err(PlanningError::ConfirmationPending);
        }
        self.notice = None;
        Ok(())
    }

    /// Drop candidates (and any in-flight search) after a parameter change.
    fn invalidate_candidates(&mut self) {
        match self.phase {
            Phase::Idle => {}
            Phase::Querying { request, .. } => {
                debug!(%request, "in-flight search abandoned after edit");
                self.phase = Phase::Idle;
            }
            Phase::Results(_) | Phase::Selected { .. } => {
                debug!("candidates invalidated after edit");
                self.phase = Phase::Idle;
            }
            Phase::Confirming { .. } => {}
        }
    }

    fn current_query(&self) -> Result<PlanningQuery, PlanningError> {
        let missing = self.missing_fields();
        match (self.map.endpoints(), self.date, self.time) {
            (Some((origin, destination)), Some(date), Some(time)) => Ok(PlanningQuery {
                origin,
                destination,
                depart_at: date.and_time(time),
            }),
            _ => Err(PlanningError::Validation { missing }),
        }
    }

    fn next_request_id(&mut self) -> RequestId {
        self.last_request += 1;
        RequestId(self.last_request)
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Start a search.
    ///
    /// Any previous candidates and selection are cleared immediately. A
    /// search already in flight is superseded: its response will be
    /// reported as stale.
    ///
    /// # Errors
    ///
    /// - `Validation` if origin, destination, date or time is missing
    /// - `ConfirmationPending` while a confirmation is in flight
    pub fn begin_query(&mut self) -> Result<QueryTicket, PlanningError> {
        self.begin_edit()?;
        let query = self.current_query()?;
        let id = self.next_request_id();

        if let Phase::Querying { request, .. } = self.phase {
            debug!(superseded = %request, by = %id, "search superseded");
        }

        self.phase = Phase::Querying {
            request: id,
            query: query.clone(),
        };
        debug!(request = %id, depart_at = %query.depart_at_wire(), "search started");
        Ok(QueryTicket { id, query })
    }

    /// Apply the response to a search.
    ///
    /// Candidates are stored verbatim, in the order received. An empty
    /// result or a failure leaves an empty set with an explanatory message;
    /// the service's own wording wins over the configured fallback.
    pub fn complete_query(
        &mut self,
        id: RequestId,
        response: Result<Vec<Itinerary>, SearchFailed>,
    ) -> QueryOutcome {
        let query = match &self.phase {
            Phase::Querying { request, query } if *request == id => query.clone(),
            _ => return QueryOutcome::Stale,
        };

        // Edits drop the in-flight search, so a current request always
        // matches the form; checked anyway before overwriting anything.
        if self.current_query().ok().as_ref() != Some(&query) {
            self.phase = Phase::Idle;
            return QueryOutcome::Stale;
        }

        let (itineraries, message) = match response {
            Ok(itineraries) if itineraries.is_empty() => (
                itineraries,
                Some(SearchMessage::NoTrips(self.config.no_trips_message.clone())),
            ),
            Ok(itineraries) => (itineraries, None),
            Err(SearchFailed::NoTrips { message }) => (
                Vec::new(),
                Some(SearchMessage::NoTrips(
                    message.unwrap_or_else(|| self.config.no_trips_message.clone()),
                )),
            ),
            Err(SearchFailed::Request(failure)) => (
                Vec::new(),
                Some(SearchMessage::Failed(
                    failure
                        .message
                        .unwrap_or_else(|| self.config.search_failed_message.clone()),
                )),
            ),
        };

        let count = itineraries.len();
        debug!(request = %id, count, "search completed");
        self.phase = Phase::Results(Candidates {
            query,
            itineraries,
            message,
            expanded: None,
        });
        QueryOutcome::Applied { candidates: count }
    }

    // ------------------------------------------------------------------
    // Inspection and selection
    // ------------------------------------------------------------------

    /// Select a candidate by position.
    ///
    /// If another candidate's details are expanded they collapse, so the
    /// detail view never shows legs of a trip other than the one chosen.
    pub fn select(&mut self, index: usize) -> Result<(), PlanningError> {
        self.begin_edit()?;
        self.candidate_set()
            .ok_or(PlanningError::NoSuchCandidate { index, count: 0 })?
            .check_index(index)?;

        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        let mut candidates = match phase {
            Phase::Results(candidates) | Phase::Selected { candidates, .. } => candidates,
            other => {
                self.phase = other;
                return Err(PlanningError::ConfirmationPending);
            }
        };

        if candidates.expanded.is_some_and(|e| e != index) {
            candidates.expanded = None;
        }
        debug!(index, "candidate selected");
        self.phase = Phase::Selected { candidates, index };
        Ok(())
    }

    /// Expand a candidate's leg list, or collapse it if already expanded.
    ///
    /// Returns the candidate now expanded, if any.
    pub fn toggle_details(&mut self, index: usize) -> Result<Option<usize>, PlanningError> {
        self.begin_edit()?;
        let candidates = self
            .candidate_set_mut()
            .ok_or(PlanningError::NoSuchCandidate { index, count: 0 })?;
        candidates.check_index(index)?;

        candidates.expanded = if candidates.expanded == Some(index) {
            None
        } else {
            Some(index)
        };
        Ok(candidates.expanded)
    }

    // ------------------------------------------------------------------
    // Confirmation
    // ------------------------------------------------------------------

    /// Start confirming the selected candidate for the session's user.
    ///
    /// # Errors
    ///
    /// - `ConfirmationPending` if a confirmation is already in flight
    /// - `NothingSelected` unless a candidate is selected
    /// - `NotLoggedIn` if the session has no user
    pub fn begin_confirm(&mut self, session: &SessionContext) -> Result<ConfirmTicket, PlanningError> {
        self.begin_edit()?;
        let Phase::Selected { candidates, index } = &self.phase else {
            return Err(PlanningError::NothingSelected);
        };
        let user = session.user().ok_or(PlanningError::NotLoggedIn)?;

        let confirmation = Confirmation {
            user,
            query: candidates.query.clone(),
            itinerary: candidates.itineraries[*index].clone(),
        };

        let id = self.next_request_id();
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        if let Phase::Selected { candidates, index } = phase {
            self.phase = Phase::Confirming {
                request: id,
                candidates,
                index,
            };
        }
        debug!(request = %id, "confirmation started");
        Ok(ConfirmTicket { id, confirmation })
    }

    /// Apply the response to a confirmation.
    ///
    /// Success resets the whole planner. Failure returns to the selection
    /// unchanged, so the user can retry without searching again.
    pub fn complete_confirm(
        &mut self,
        id: RequestId,
        response: Result<Acknowledgement, RequestFailed>,
    ) -> ConfirmOutcome {
        match &self.phase {
            Phase::Confirming { request, .. } if *request == id => {}
            _ => return ConfirmOutcome::Stale,
        }

        match response {
            Ok(ack) => {
                debug!(request = %id, "confirmation accepted");
                self.clear_all();
                self.notice = Some(Notice {
                    level: NoticeLevel::Success,
                    text: ack
                        .message
                        .unwrap_or_else(|| self.config.confirmed_message.clone()),
                });
                ConfirmOutcome::Confirmed
            }
            Err(failure) => {
                debug!(request = %id, "confirmation refused");
                let phase = std::mem::replace(&mut self.phase, Phase::Idle);
                if let Phase::Confirming {
                    candidates, index, ..
                } = phase
                {
                    self.phase = Phase::Selected { candidates, index };
                }
                self.notice = Some(Notice {
                    level: NoticeLevel::Error,
                    text: match failure.message {
                        Some(message) => format!("Error: {message}"),
                        None => self.config.confirm_failed_message.clone(),
                    },
                });
                ConfirmOutcome::Failed
            }
        }
    }

    // ------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------

    /// Return to an empty planner from any phase.
    ///
    /// Requests in flight become stale.
    pub fn reset_all(&mut self) {
        debug!("planner reset");
        self.clear_all();
        self.notice = None;
    }

    fn clear_all(&mut self) {
        self.map.clear_all();
        self.date = None;
        self.time = None;
        self.phase = Phase::Idle;
    }
}
