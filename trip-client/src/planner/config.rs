//! User-facing messages of the planner.

/// Messages the planner surfaces when the service gives none of its own.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Shown when a search succeeds with zero candidates.
    pub no_trips_message: String,

    /// Shown when a search fails without a service message.
    pub search_failed_message: String,

    /// Shown after a confirmation succeeds without a service message.
    pub confirmed_message: String,

    /// Shown when a confirmation fails without a service message.
    pub confirm_failed_message: String,
}

impl PlannerConfig {
    /// Override the zero-candidate message.
    pub fn with_no_trips_message(mut self, message: impl Into<String>) -> Self {
        self.no_trips_message = message.into();
        self
    }

    /// Override the search failure fallback.
    pub fn with_search_failed_message(mut self, message: impl Into<String>) -> Self {
        self.search_failed_message = message.into();
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            no_trips_message: "No trips found.".to_string(),
            search_failed_message: "Server error.".to_string(),
            confirmed_message: "Trip confirmed!".to_string(),
            confirm_failed_message: "Error confirming trip.".to_string(),
        }
    }
}
