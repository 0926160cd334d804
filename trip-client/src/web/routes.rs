//! HTTP route handlers.

use std::path::Path as FsPath;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;
use tracing::{debug, error, info, warn};

use crate::domain::{GeoPoint, UserId};
use crate::history::{HistoryBrowser, HistoryError};
use crate::map::Endpoint;
use crate::planner::{PlanningError, TripPlanner, run_confirm, run_search};
use crate::session::SessionError;

use super::cookie::Browser;
use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: impl AsRef<FsPath>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/planner", get(planner_snapshot))
        .route("/planner/points", post(pick_point))
        .route("/planner/points/:which", put(drag_point).delete(clear_point))
        .route("/planner/departure", put(set_departure))
        .route("/planner/search", post(search))
        .route("/planner/select/:index", post(select_candidate))
        .route("/planner/details/:index", post(toggle_details))
        .route("/planner/confirm", post(confirm))
        .route("/planner/reset", post(reset))
        .route("/planner/overlay", get(overlay))
        .route("/session", post(login).delete(logout))
        .route("/history", get(history_page))
        .route("/history/select/:id", post(select_history))
        .route("/history/draft", put(update_draft))
        .route("/history/save", post(save_history))
        .route("/history/selected", delete(delete_history))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .fallback(not_found)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn render(template: &impl Template) -> Result<String, AppError> {
    template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

// ============================================================================
// Planner
// ============================================================================

/// Planner page.
async fn index_page(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    let planner = browser.session.planner.lock().await;
    let view = PlannerView::new(&planner, &browser.session.context);
    let html = render(&IndexTemplate { view })?;
    Ok(browser.respond(Html(html)))
}

/// The planner snapshot as JSON, or the planner panel for HTML requests.
fn planner_response(
    browser: &Browser,
    planner: &TripPlanner,
    headers: &HeaderMap,
) -> Result<Response, AppError> {
    let view = PlannerView::new(planner, &browser.session.context);
    if accepts_html(headers) {
        let html = render(&PlannerTemplate { view })?;
        Ok(browser.respond(Html(html)))
    } else {
        Ok(browser.respond(Json(view)))
    }
}

async fn planner_snapshot(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    let planner = browser.session.planner.lock().await;
    planner_response(&browser, &planner, &headers)
}

fn parse_point(req: PointRequest) -> Result<GeoPoint, AppError> {
    GeoPoint::new(req.lat, req.lng).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

fn parse_endpoint(which: &str) -> Result<Endpoint, AppError> {
    which
        .parse()
        .map_err(|message| AppError::BadRequest { message })
}

/// Map click: sets origin, then destination, then nothing.
async fn pick_point(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PointRequest>,
) -> Result<Response, AppError> {
    let point = parse_point(req)?;
    let browser = Browser::resolve(&state, &headers).await;
    let mut planner = browser.session.planner.lock().await;
    let outcome = planner.pick_point(point)?;
    debug!(?outcome, %point, "map pick");
    planner_response(&browser, &planner, &headers)
}

/// Marker drag.
async fn drag_point(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(which): Path<String>,
    Json(req): Json<PointRequest>,
) -> Result<Response, AppError> {
    let which = parse_endpoint(&which)?;
    let point = parse_point(req)?;
    let browser = Browser::resolve(&state, &headers).await;
    let mut planner = browser.session.planner.lock().await;
    planner.drag_point(which, point)?;
    planner_response(&browser, &planner, &headers)
}

async fn clear_point(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(which): Path<String>,
) -> Result<Response, AppError> {
    let which = parse_endpoint(&which)?;
    let browser = Browser::resolve(&state, &headers).await;
    let mut planner = browser.session.planner.lock().await;
    planner.clear_point(which)?;
    planner_response(&browser, &planner, &headers)
}

/// Departure date and time from the form. Absent fields are left alone.
async fn set_departure(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<DepartureRequest>,
) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    let mut planner = browser.session.planner.lock().await;
    if let Some(date) = &req.date {
        planner.set_date_input(date)?;
    }
    if let Some(time) = &req.time {
        planner.set_time_input(time)?;
    }
    planner_response(&browser, &planner, &headers)
}

/// Run a search. The session lock is released while the trips API works.
async fn search(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    let outcome = run_search(&browser.session.planner, state.trips.as_ref()).await?;
    debug!(?outcome, "search finished");
    let planner = browser.session.planner.lock().await;
    planner_response(&browser, &planner, &headers)
}

async fn select_candidate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(index): Path<usize>,
) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    let mut planner = browser.session.planner.lock().await;
    planner.select(index)?;
    planner_response(&browser, &planner, &headers)
}

async fn toggle_details(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(index): Path<usize>,
) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    let mut planner = browser.session.planner.lock().await;
    planner.toggle_details(index)?;
    planner_response(&browser, &planner, &headers)
}

/// Confirm the selected trip for the logged-in user.
async fn confirm(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    let outcome = run_confirm(
        &browser.session.planner,
        state.trips.as_ref(),
        &browser.session.context,
    )
    .await?;
    debug!(?outcome, "confirmation finished");
    let planner = browser.session.planner.lock().await;
    planner_response(&browser, &planner, &headers)
}

async fn reset(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    let mut planner = browser.session.planner.lock().await;
    planner.reset_all();
    planner_response(&browser, &planner, &headers)
}

/// Markers and polylines for the map.
async fn overlay(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let browser = Browser::resolve(&state, &headers).await;
    let planner = browser.session.planner.lock().await;
    browser.respond(Json(OverlayView::new(&planner)))
}

// ============================================================================
// Session
// ============================================================================

/// Adopt the identity established by the external login flow.
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let user = UserId::new(&req.user_id).ok_or_else(|| AppError::BadRequest {
        message: "user_id must not be empty".to_string(),
    })?;
    let browser = Browser::resolve(&state, &headers).await;
    browser.session.context.login(user)?;
    browser.session.history.lock().await.clear();
    Ok(browser.respond(Json(SessionView::new(&browser.session.context))))
}

/// Log out: forget the identity and anything shown for it.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    browser.session.context.logout()?;
    browser.session.history.lock().await.clear();
    info!("browser session logged out");
    Ok(browser.respond(Json(SessionView::new(&browser.session.context))))
}

// ============================================================================
// History
// ============================================================================

fn history_response(
    browser: &Browser,
    history: &HistoryBrowser,
    headers: &HeaderMap,
) -> Result<Response, AppError> {
    let view = HistoryView::new(history, &browser.session.context);
    if accepts_html(headers) {
        let html = render(&HistoryPanelTemplate { view })?;
        Ok(browser.respond(Html(html)))
    } else {
        Ok(browser.respond(Json(view)))
    }
}

/// History page. HTML requests get the full page, with a login prompt
/// instead of an error when nobody is logged in.
async fn history_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryPageQuery>,
) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    let service = state.history.as_ref();
    let mut history = browser.session.history.lock().await;

    let result = match (query.nav, query.page) {
        (Some(HistoryNav::Next), _) => history.next_page(service).await,
        (Some(HistoryNav::Previous), _) => history.previous_page(service).await,
        (None, Some(page)) => history.load_page(service, page).await,
        (None, None) => history.refresh(service).await,
    };

    if !accepts_html(&headers) {
        result?;
        return history_response(&browser, &history, &headers);
    }

    match result {
        Ok(()) | Err(HistoryError::NotLoggedIn) | Err(HistoryError::LastPage) => {}
        Err(e) => return Err(e.into()),
    }
    let view = HistoryView::new(&history, &browser.session.context);
    let html = render(&HistoryTemplate { view })?;
    Ok(browser.respond(Html(html)))
}

async fn select_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    let mut history = browser.session.history.lock().await;
    history.select(state.history.as_ref(), id).await?;
    history_response(&browser, &history, &headers)
}

async fn update_draft(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<DraftRequest>,
) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    let mut history = browser.session.history.lock().await;
    if let Some(notes) = req.notes {
        history.set_notes(notes)?;
    }
    if let Some(rating) = req.rating {
        history.set_rating(rating)?;
    }
    history_response(&browser, &history, &headers)
}

/// Run a history write. A refused write leaves an error notice on the
/// page, so the snapshot is still returned.
fn history_write(
    browser: &Browser,
    history: &HistoryBrowser,
    result: Result<(), HistoryError>,
    headers: &HeaderMap,
) -> Result<Response, AppError> {
    match result {
        Ok(()) | Err(HistoryError::Request(_)) => history_response(browser, history, headers),
        Err(e) => Err(e.into()),
    }
}

async fn save_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    let mut history = browser.session.history.lock().await;
    let result = history.save(state.history.as_ref()).await;
    history_write(&browser, &history, result, &headers)
}

async fn delete_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let browser = Browser::resolve(&state, &headers).await;
    let mut history = browser.session.history.lock().await;
    let result = history.delete(state.history.as_ref()).await;
    history_write(&browser, &history, result, &headers)
}

// ============================================================================
// Fallback & errors
// ============================================================================

async fn not_found(headers: HeaderMap, uri: Uri) -> Response {
    if accepts_html(&headers) {
        let template = ErrorTemplate {
            title: "Not found".to_string(),
            message: format!("There is nothing at {}.", uri.path()),
            details: None,
        };
        return match render(&template) {
            Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
            Err(e) => e.into_response(),
        };
    }
    AppError::NotFound {
        message: format!("no route for {}", uri.path()),
    }
    .into_response()
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<PlanningError> for AppError {
    fn from(e: PlanningError) -> Self {
        match e {
            PlanningError::NoSuchCandidate { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl From<HistoryError> for AppError {
    fn from(e: HistoryError) -> Self {
        match e {
            HistoryError::NoSuchEntry(_) => AppError::NotFound {
                message: e.to_string(),
            },
            HistoryError::Request(_) => AppError::Internal {
                message: e.to_string(),
            },
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request refused");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
