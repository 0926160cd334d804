//! Planner error types.

use std::fmt;

use crate::domain::DomainError;

/// A query parameter the user has to supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    Origin,
    Destination,
    Date,
    Time,
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryField::Origin => "start",
            QueryField::Destination => "end",
            QueryField::Date => "date",
            QueryField::Time => "time",
        })
    }
}

fn field_list(fields: &[QueryField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Actions the planner refuses locally, before any network call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanningError {
    /// Search requested before every query parameter was set
    #[error("please select {}", field_list(.missing))]
    Validation { missing: Vec<QueryField> },

    /// Selected or expanded a position outside the candidate list
    #[error("no trip at position {index} ({count} available)")]
    NoSuchCandidate { index: usize, count: usize },

    /// Confirm requested with no selection
    #[error("no trip selected")]
    NothingSelected,

    /// Confirm requested without a logged-in user
    #[error("please log in first")]
    NotLoggedIn,

    /// Edit or new request while a confirmation is in flight
    #[error("a trip confirmation is in progress")]
    ConfirmationPending,

    /// A form value could not be parsed
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// A trip query or confirmation that the service rejected or never answered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request failed: {}", .message.as_deref().unwrap_or("no message from service"))]
pub struct RequestFailed {
    /// Message supplied by the service, shown verbatim when present
    pub message: Option<String>,
}

impl RequestFailed {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn without_message() -> Self {
        Self { message: None }
    }
}

/// Why a search produced no candidates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchFailed {
    /// The service found nothing for the query; its message, if any, is shown
    #[error("no trips found: {}", .message.as_deref().unwrap_or("no message from service"))]
    NoTrips { message: Option<String> },

    #[error(transparent)]
    Request(#[from] RequestFailed),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PlanningError::Validation {
            missing: vec![QueryField::Origin, QueryField::Time],
        };
        assert_eq!(err.to_string(), "please select start, time");

        let err = PlanningError::NoSuchCandidate { index: 4, count: 2 };
        assert_eq!(err.to_string(), "no trip at position 4 (2 available)");

        let err = PlanningError::from(DomainError::InvalidDate("x".into()));
        assert_eq!(err.to_string(), "invalid date: x");
    }

    #[test]
    fn request_failed_display() {
        assert_eq!(
            RequestFailed::with_message("No trips found").to_string(),
            "request failed: No trips found"
        );
        assert_eq!(
            RequestFailed::without_message().to_string(),
            "request failed: no message from service"
        );
    }

    #[test]
    fn search_failed_display() {
        let err = SearchFailed::NoTrips {
            message: Some("No valid bus trips found".into()),
        };
        assert_eq!(err.to_string(), "no trips found: No valid bus trips found");

        let err = SearchFailed::from(RequestFailed::without_message());
        assert_eq!(err.to_string(), "request failed: no message from service");
    }
}
