//! Askama templates for the web frontend.

use askama::Template;

use super::dto::{HistoryView, PlannerView};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Planner page: map, query form and results.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: PlannerView,
}

/// Travel history page.
#[derive(Template)]
#[template(path = "history.html")]
pub struct HistoryTemplate {
    pub view: HistoryView,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Planner panel, re-rendered after every planner action.
#[derive(Template)]
#[template(path = "planner.html")]
pub struct PlannerTemplate {
    pub view: PlannerView,
}

/// History panel, re-rendered after every history action.
#[derive(Template)]
#[template(path = "history_panel.html")]
pub struct HistoryPanelTemplate {
    pub view: HistoryView,
}
