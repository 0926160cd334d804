//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{GeoPoint, Itinerary};
use crate::history::{HistoryBrowser, HistoryEntry, LegRow};
use crate::planner::{Notice, NoticeLevel, PhaseKind, SearchMessage, TripPlanner};
use crate::render::{LegSummary, PathSegment, SkippedLeg, itinerary_window, overlays, summarize};
use crate::session::SessionContext;

// ============================================================================
// Requests
// ============================================================================

/// A map position from a click or drag.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Departure form values. An empty string clears the field.
#[derive(Debug, Deserialize)]
pub struct DepartureRequest {
    /// "YYYY-MM-DD"
    pub date: Option<String>,
    /// "HH:MM"
    pub time: Option<String>,
}

/// Identity handed over by the external login flow.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryNav {
    Next,
    Previous,
}

/// `GET /history` parameters: an explicit page, or a step from the
/// current one. Neither reloads the current page.
#[derive(Debug, Deserialize)]
pub struct HistoryPageQuery {
    pub page: Option<u32>,
    pub nav: Option<HistoryNav>,
}

/// Edits to the selected history entry. Absent fields are left alone.
#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub notes: Option<String>,
    pub rating: Option<u8>,
}

// ============================================================================
// Planner snapshot
// ============================================================================

/// One candidate trip in the results list.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateView {
    pub index: usize,
    /// "HH:MM - HH:MM"
    pub window: String,
    pub legs: Vec<LegSummary>,
    pub is_selected: bool,
    pub is_expanded: bool,
}

impl CandidateView {
    fn new(index: usize, itinerary: &Itinerary, planner: &TripPlanner) -> Self {
        Self {
            index,
            window: itinerary_window(itinerary),
            legs: itinerary.legs.iter().map(summarize).collect(),
            is_selected: planner.selected_index() == Some(index),
            is_expanded: planner.expanded_index() == Some(index),
        }
    }
}

/// Everything the planner page shows, returned by every planner action.
#[derive(Debug, Clone, Serialize)]
pub struct PlannerView {
    pub phase: PhaseKind,
    pub origin: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
    /// "YYYY-MM-DD"
    pub date: Option<String>,
    /// "HH:MM"
    pub time: Option<String>,
    pub candidates: Vec<CandidateView>,
    pub message: Option<SearchMessage>,
    pub notice: Option<Notice>,
    /// Fields still needed before searching ("start", "end", ...)
    pub missing: Vec<String>,
    pub can_search: bool,
    pub can_confirm: bool,
    pub is_busy: bool,
    pub logged_in: bool,
}

impl PlannerView {
    pub fn new(planner: &TripPlanner, session: &SessionContext) -> Self {
        Self {
            phase: planner.phase(),
            origin: planner.origin(),
            destination: planner.destination(),
            date: planner.date().map(|d| d.format("%Y-%m-%d").to_string()),
            time: planner.time().map(|t| t.format("%H:%M").to_string()),
            candidates: planner
                .candidates()
                .iter()
                .enumerate()
                .map(|(i, itinerary)| CandidateView::new(i, itinerary, planner))
                .collect(),
            message: planner.search_message().cloned(),
            notice: planner.notice().cloned(),
            missing: planner
                .missing_fields()
                .iter()
                .map(ToString::to_string)
                .collect(),
            can_search: planner.can_search(),
            can_confirm: planner.can_confirm() && session.is_logged_in(),
            is_busy: planner.is_busy(),
            logged_in: session.is_logged_in(),
        }
    }

    pub fn origin_text(&self) -> String {
        self.origin
            .map_or_else(|| "click the map".to_string(), |p| p.to_string())
    }

    pub fn destination_text(&self) -> String {
        self.destination
            .map_or_else(|| "click the map".to_string(), |p| p.to_string())
    }

    pub fn date_value(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }

    pub fn time_value(&self) -> &str {
        self.time.as_deref().unwrap_or("")
    }

    pub fn message_text(&self) -> &str {
        self.message.as_ref().map_or("", SearchMessage::text)
    }

    pub fn notice_text(&self) -> &str {
        self.notice.as_ref().map_or("", |n| n.text.as_str())
    }

    /// CSS class for the notice banner.
    pub fn notice_class(&self) -> &'static str {
        match self.notice.as_ref().map(|n| n.level) {
            Some(NoticeLevel::Success) => "notice success",
            Some(NoticeLevel::Error) => "notice error",
            None => "notice",
        }
    }

    /// A trip is chosen but nobody is logged in to confirm it.
    pub fn needs_login(&self) -> bool {
        self.phase == PhaseKind::Selected && !self.logged_in
    }

    pub fn phase_name(&self) -> &'static str {
        match self.phase {
            PhaseKind::Idle => "idle",
            PhaseKind::Querying => "querying",
            PhaseKind::Results => "results",
            PhaseKind::Selected => "selected",
            PhaseKind::Confirming => "confirming",
        }
    }
}

/// What to draw on the map: the two markers and the selected trip.
#[derive(Debug, Clone, Serialize)]
pub struct OverlayView {
    pub origin: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
    pub segments: Vec<PathSegment>,
    pub skipped: Vec<SkippedLeg>,
}

impl OverlayView {
    pub fn new(planner: &TripPlanner) -> Self {
        let drawn = planner.selected().map(overlays).unwrap_or_default();
        Self {
            origin: planner.origin(),
            destination: planner.destination(),
            segments: drawn.segments,
            skipped: drawn.skipped,
        }
    }
}

// ============================================================================
// History snapshot
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntryView {
    pub history_id: i64,
    pub travel_date: String,
    /// Departure "HH:MM", or "N/A"
    pub start: String,
    pub is_selected: bool,
}

impl HistoryEntryView {
    fn new(entry: &HistoryEntry, selected: Option<i64>) -> Self {
        Self {
            history_id: entry.history_id,
            travel_date: entry.travel_date.clone().unwrap_or_default(),
            start: entry.start_clock(),
            is_selected: selected == Some(entry.history_id),
        }
    }
}

/// A rating choice in the history editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingOption {
    pub value: u8,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistorySelectionView {
    pub history_id: i64,
    pub travel_date: String,
    pub start: String,
    pub legs: Vec<LegRow>,
    pub notes: String,
    pub rating: u8,
}

impl HistorySelectionView {
    /// The 0-5 rating choices with the current one marked.
    pub fn rating_options(&self) -> Vec<RatingOption> {
        (0..=5)
            .map(|value| RatingOption {
                value,
                selected: value == self.rating,
            })
            .collect()
    }
}

/// Everything the history page shows.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub page: u32,
    pub is_first_page: bool,
    pub is_last_page: bool,
    pub entries: Vec<HistoryEntryView>,
    pub selection: Option<HistorySelectionView>,
    pub notice: Option<Notice>,
    pub logged_in: bool,
}

impl HistoryView {
    pub fn new(browser: &HistoryBrowser, session: &SessionContext) -> Self {
        let selected = browser.selection().map(|s| s.entry.history_id);
        Self {
            page: browser.page(),
            is_first_page: browser.is_first_page(),
            is_last_page: browser.is_last_page(),
            entries: browser
                .entries()
                .iter()
                .map(|e| HistoryEntryView::new(e, selected))
                .collect(),
            selection: browser.selection().map(|s| HistorySelectionView {
                history_id: s.entry.history_id,
                travel_date: s.entry.travel_date.clone().unwrap_or_default(),
                start: s.entry.start_clock(),
                legs: s.legs.iter().map(|leg| leg.row()).collect(),
                notes: s.notes.clone(),
                rating: s.rating,
            }),
            notice: browser.notice().cloned(),
            logged_in: session.is_logged_in(),
        }
    }

    pub fn notice_text(&self) -> &str {
        self.notice.as_ref().map_or("", |n| n.text.as_str())
    }

    pub fn notice_class(&self) -> &'static str {
        match self.notice.as_ref().map(|n| n.level) {
            Some(NoticeLevel::Success) => "notice success",
            Some(NoticeLevel::Error) => "notice error",
            None => "notice",
        }
    }
}

// ============================================================================
// Misc
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub logged_in: bool,
    pub user_id: Option<String>,
}

impl SessionView {
    pub fn new(session: &SessionContext) -> Self {
        let user = session.user();
        Self {
            logged_in: user.is_some(),
            user_id: user.map(|u| u.as_str().to_string()),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
