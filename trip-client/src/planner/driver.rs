//! Async glue between the planner and the trips service.
//!
//! The planner itself never awaits. These helpers start a request under
//! the session lock, release the lock while the network call runs, and
//! re-acquire it to apply the response. Because every response carries
//! its ticket id, a slow reply to a superseded search is dropped instead
//! of overwriting newer results.
//!
//! If the caller drops the future mid-request (a browser that disconnects,
//! say), the ticket is completed as a failure so the planner never stays
//! in flight.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::Itinerary;
use crate::session::SessionContext;

use super::error::{PlanningError, RequestFailed, SearchFailed};
use super::machine::{ConfirmOutcome, QueryOutcome, TripPlanner};
use super::query::{Acknowledgement, Confirmation, PlanningQuery, RequestId};

/// The trip query and confirmation endpoints.
///
/// This abstraction allows the planner to be driven against mock data.
pub trait TripService: Send + Sync {
    /// Fetch candidate itineraries for a query, ranked by the service.
    ///
    /// A service that finds nothing answers `SearchFailed::NoTrips` with
    /// its own explanation rather than an empty list.
    fn search_trips<'a>(
        &'a self,
        query: &'a PlanningQuery,
    ) -> BoxFuture<'a, Result<Vec<Itinerary>, SearchFailed>>;

    /// Record the chosen itinerary for a user.
    fn confirm_trip<'a>(
        &'a self,
        confirmation: &'a Confirmation,
    ) -> BoxFuture<'a, Result<Acknowledgement, RequestFailed>>;
}

#[derive(Debug, Clone, Copy)]
enum RequestKind {
    Search,
    Confirm,
}

/// An outstanding ticket, failed on drop unless it was completed.
struct InFlight {
    planner: Arc<Mutex<TripPlanner>>,
    id: RequestId,
    kind: RequestKind,
    completed: bool,
}

impl InFlight {
    fn new(planner: &Arc<Mutex<TripPlanner>>, id: RequestId, kind: RequestKind) -> Self {
        Self {
            planner: planner.clone(),
            id,
            kind,
            completed: false,
        }
    }

    fn complete(mut self) {
        self.completed = true;
    }
}

fn abandon(planner: &mut TripPlanner, id: RequestId, kind: RequestKind) {
    match kind {
        RequestKind::Search => {
            planner.complete_query(id, Err(RequestFailed::without_message().into()));
        }
        RequestKind::Confirm => {
            planner.complete_confirm(id, Err(RequestFailed::without_message()));
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        let (id, kind) = (self.id, self.kind);
        warn!(request = %id, ?kind, "request abandoned before its response was applied");

        if let Ok(mut planner) = self.planner.try_lock() {
            abandon(&mut planner, id, kind);
            return;
        }
        // Someone else holds the session; finish once they let go.
        let planner = self.planner.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move { abandon(&mut *planner.lock().await, id, kind) });
            }
            Err(_) => error!(request = %id, "no runtime to release abandoned request"),
        }
    }
}

/// Run a search for the planner's current query.
///
/// Validation errors are returned before any request is made. A response
/// that arrives after the search was superseded yields
/// `QueryOutcome::Stale` and leaves the planner untouched.
pub async fn run_search(
    planner: &Arc<Mutex<TripPlanner>>,
    service: &dyn TripService,
) -> Result<QueryOutcome, PlanningError> {
    let ticket = planner.lock().await.begin_query()?;
    let in_flight = InFlight::new(planner, ticket.id, RequestKind::Search);
    info!(
        request = %ticket.id,
        origin = %ticket.query.origin,
        destination = %ticket.query.destination,
        depart_at = %ticket.query.depart_at_wire(),
        "searching trips"
    );

    let response = service.search_trips(&ticket.query).await;
    match &response {
        Err(SearchFailed::NoTrips { message }) => {
            let message = message.as_deref().unwrap_or("");
            debug!(request = %ticket.id, message, "no trips found");
        }
        Err(SearchFailed::Request(failure)) => {
            error!(request = %ticket.id, %failure, "trip search failed");
        }
        Ok(_) => {}
    }

    let outcome = planner.lock().await.complete_query(ticket.id, response);
    in_flight.complete();
    if outcome == QueryOutcome::Stale {
        warn!(request = %ticket.id, "discarding stale search response");
    }
    Ok(outcome)
}

/// Confirm the planner's selected itinerary for the session's user.
pub async fn run_confirm(
    planner: &Arc<Mutex<TripPlanner>>,
    service: &dyn TripService,
    session: &SessionContext,
) -> Result<ConfirmOutcome, PlanningError> {
    let ticket = planner.lock().await.begin_confirm(session)?;
    let in_flight = InFlight::new(planner, ticket.id, RequestKind::Confirm);
    info!(request = %ticket.id, user = %ticket.confirmation.user, "confirming trip");

    let response = service.confirm_trip(&ticket.confirmation).await;
    if let Err(failure) = &response {
        error!(request = %ticket.id, %failure, "trip confirmation failed");
    }

    let outcome = planner.lock().await.complete_confirm(ticket.id, response);
    in_flight.complete();
    if outcome == ConfirmOutcome::Stale {
        warn!(request = %ticket.id, "discarding stale confirmation response");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use futures::FutureExt;
    use tokio::sync::{mpsc, oneshot};

    use super::*;
    use crate::domain::UserId;
    use crate::planner::PhaseKind;
    use crate::test_utils::*;

    type SearchReply = Result<Vec<Itinerary>, SearchFailed>;

    /// Service whose responses are released by the test, one per call.
    struct GatedService {
        replies: std::sync::Mutex<VecDeque<oneshot::Receiver<SearchReply>>>,
        started: mpsc::UnboundedSender<PlanningQuery>,
        confirm_reply: Result<Acknowledgement, RequestFailed>,
        confirmed: std::sync::Mutex<Vec<Confirmation>>,
    }

    impl GatedService {
        fn new(
            confirm_reply: Result<Acknowledgement, RequestFailed>,
        ) -> (Arc<Self>, mpsc::UnboundedReceiver<PlanningQuery>) {
            let (started, started_rx) = mpsc::unbounded_channel();
            let service = Arc::new(Self {
                replies: std::sync::Mutex::new(VecDeque::new()),
                started,
                confirm_reply,
                confirmed: std::sync::Mutex::new(Vec::new()),
            });
            (service, started_rx)
        }

        fn expect_call(&self) -> oneshot::Sender<SearchReply> {
            let (tx, rx) = oneshot::channel();
            self.replies.lock().unwrap().push_back(rx);
            tx
        }
    }

    impl TripService for GatedService {
        fn search_trips<'a>(
            &'a self,
            query: &'a PlanningQuery,
        ) -> BoxFuture<'a, Result<Vec<Itinerary>, SearchFailed>> {
            async move {
                let reply = self.replies.lock().unwrap().pop_front().unwrap();
                self.started.send(query.clone()).unwrap();
                reply
                    .await
                    .unwrap_or_else(|_| Err(RequestFailed::without_message().into()))
            }
            .boxed()
        }

        fn confirm_trip<'a>(
            &'a self,
            confirmation: &'a Confirmation,
        ) -> BoxFuture<'a, Result<Acknowledgement, RequestFailed>> {
            async move {
                self.confirmed.lock().unwrap().push(confirmation.clone());
                self.confirm_reply.clone()
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn search_applies_response() {
        let (service, mut started) = GatedService::new(Ok(Acknowledgement::default()));
        let planner = Arc::new(Mutex::new(ready_planner()));

        let reply = service.expect_call();
        let task = {
            let (planner, service) = (planner.clone(), service.clone());
            tokio::spawn(async move { run_search(&planner, service.as_ref()).await })
        };

        let query = started.recv().await.unwrap();
        assert_eq!(query.depart_at_wire(), "2024-05-01T08:00:00");
        assert_eq!(planner.lock().await.phase(), PhaseKind::Querying);

        reply.send(Ok(vec![simple_itinerary("08:03", "08:20")])).unwrap();
        let outcome = task.await.unwrap().unwrap();

        assert_eq!(outcome, QueryOutcome::Applied { candidates: 1 });
        assert_eq!(planner.lock().await.phase(), PhaseKind::Results);
    }

    #[tokio::test]
    async fn slow_superseded_response_is_discarded() {
        let (service, mut started) = GatedService::new(Ok(Acknowledgement::default()));
        let planner = Arc::new(Mutex::new(ready_planner()));

        let first_reply = service.expect_call();
        let first = {
            let (planner, service) = (planner.clone(), service.clone());
            tokio::spawn(async move { run_search(&planner, service.as_ref()).await })
        };
        started.recv().await.unwrap();

        let second_reply = service.expect_call();
        let second = {
            let (planner, service) = (planner.clone(), service.clone());
            tokio::spawn(async move { run_search(&planner, service.as_ref()).await })
        };
        started.recv().await.unwrap();

        let newer = vec![simple_itinerary("09:00", "09:30")];
        second_reply.send(Ok(newer.clone())).unwrap();
        assert_eq!(
            second.await.unwrap().unwrap(),
            QueryOutcome::Applied { candidates: 1 }
        );

        first_reply
            .send(Ok(vec![
                simple_itinerary("08:00", "08:30"),
                simple_itinerary("08:10", "08:40"),
            ]))
            .unwrap();
        assert_eq!(first.await.unwrap().unwrap(), QueryOutcome::Stale);

        assert_eq!(planner.lock().await.candidates(), newer.as_slice());
    }

    #[tokio::test]
    async fn validation_error_makes_no_request() {
        let (service, mut started) = GatedService::new(Ok(Acknowledgement::default()));
        let planner = Arc::new(Mutex::new(crate::planner::TripPlanner::default()));

        let result = run_search(&planner, service.as_ref()).await;
        assert!(matches!(result, Err(PlanningError::Validation { .. })));
        assert!(started.try_recv().is_err());
    }

    #[tokio::test]
    async fn confirm_round_trip() {
        let (service, mut started) = GatedService::new(Ok(Acknowledgement {
            message: Some("Trip saved successfully!".into()),
        }));
        let planner = Arc::new(Mutex::new(ready_planner()));
        let session = SessionContext::ephemeral("t");
        session.login(UserId::new("7").unwrap()).unwrap();

        let reply = service.expect_call();
        reply.send(Ok(vec![simple_itinerary("08:03", "08:20")])).unwrap();
        run_search(&planner, service.as_ref()).await.unwrap();
        started.recv().await.unwrap();
        planner.lock().await.select(0).unwrap();

        let outcome = run_confirm(&planner, service.as_ref(), &session)
            .await
            .unwrap();
        assert_eq!(outcome, ConfirmOutcome::Confirmed);

        let confirmed = service.confirmed.lock().unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].user.as_str(), "7");
        assert_eq!(confirmed[0].query.depart_at_wire(), "2024-05-01T08:00:00");

        let planner = planner.lock().await;
        assert_eq!(planner.phase(), PhaseKind::Idle);
        assert_eq!(planner.notice().unwrap().text, "Trip saved successfully!");
    }

    #[tokio::test]
    async fn confirm_failure_keeps_selection() {
        let (service, _started) =
            GatedService::new(Err(RequestFailed::with_message("database unavailable")));
        let planner = Arc::new(Mutex::new(ready_planner()));
        let session = SessionContext::ephemeral("t");
        session.login(UserId::new("7").unwrap()).unwrap();

        let reply = service.expect_call();
        reply.send(Ok(vec![simple_itinerary("08:03", "08:20")])).unwrap();
        run_search(&planner, service.as_ref()).await.unwrap();
        planner.lock().await.select(0).unwrap();

        let outcome = run_confirm(&planner, service.as_ref(), &session)
            .await
            .unwrap();
        assert_eq!(outcome, ConfirmOutcome::Failed);

        let planner = planner.lock().await;
        assert_eq!(planner.phase(), PhaseKind::Selected);
        assert_eq!(planner.selected_index(), Some(0));
        assert_eq!(planner.notice().unwrap().text, "Error: database unavailable");
    }

    /// Accepts every request and never answers.
    struct Silent;

    impl TripService for Silent {
        fn search_trips<'a>(
            &'a self,
            _query: &'a PlanningQuery,
        ) -> BoxFuture<'a, Result<Vec<Itinerary>, SearchFailed>> {
            futures::future::pending().boxed()
        }

        fn confirm_trip<'a>(
            &'a self,
            _confirmation: &'a Confirmation,
        ) -> BoxFuture<'a, Result<Acknowledgement, RequestFailed>> {
            futures::future::pending().boxed()
        }
    }

    async fn selected_planner() -> Arc<Mutex<TripPlanner>> {
        let planner = Arc::new(Mutex::new(ready_planner()));
        {
            let mut planner = planner.lock().await;
            let ticket = planner.begin_query().unwrap();
            planner.complete_query(ticket.id, Ok(vec![simple_itinerary("08:03", "08:20")]));
            planner.select(0).unwrap();
        }
        planner
    }

    #[tokio::test]
    async fn dropped_confirmation_releases_the_selection() {
        let planner = selected_planner().await;
        let session = SessionContext::ephemeral("t");
        session.login(UserId::new("7").unwrap()).unwrap();

        let result = tokio::time::timeout(
            Duration::from_millis(20),
            run_confirm(&planner, &Silent, &session),
        )
        .await;
        assert!(result.is_err());

        let mut planner = planner.lock().await;
        assert_eq!(planner.phase(), PhaseKind::Selected);
        assert_eq!(planner.selected_index(), Some(0));
        assert_eq!(planner.notice().unwrap().level, crate::planner::NoticeLevel::Error);
        planner.select(0).unwrap();
    }

    #[tokio::test]
    async fn dropped_search_is_not_left_in_flight() {
        let planner = Arc::new(Mutex::new(ready_planner()));

        let result =
            tokio::time::timeout(Duration::from_millis(20), run_search(&planner, &Silent)).await;
        assert!(result.is_err());

        let planner = planner.lock().await;
        assert_eq!(planner.phase(), PhaseKind::Results);
        assert!(!planner.is_busy());
        assert_eq!(planner.search_message().unwrap().text(), "Server error.");
    }

    #[tokio::test]
    async fn dropped_while_session_is_locked_finishes_later() {
        let planner = selected_planner().await;
        let session = SessionContext::ephemeral("t");
        session.login(UserId::new("7").unwrap()).unwrap();

        let mut confirm = Box::pin(run_confirm(&planner, &Silent, &session));
        assert!(futures::poll!(&mut confirm).is_pending());

        let held = planner.lock().await;
        drop(confirm);
        assert_eq!(held.phase(), PhaseKind::Confirming);
        drop(held);

        for _ in 0..10 {
            if planner.lock().await.phase() != PhaseKind::Confirming {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(planner.lock().await.phase(), PhaseKind::Selected);
    }
}
