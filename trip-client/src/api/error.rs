//! Trips API client error types.

use std::fmt;

use crate::planner::RequestFailed;

/// Errors from the trips API client.
#[derive(Debug)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// The service answered 404: no matching trips, or an unknown history id
    NotFound { message: Option<String> },

    /// API returned an error status code
    Service {
        status: u16,
        message: Option<String>,
    },
}

impl ApiError {
    /// The message supplied by the service, if any.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { message } | ApiError::Service { message, .. } => {
                message.as_deref()
            }
            ApiError::Http(_) | ApiError::Json { .. } => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http(e) => write!(f, "HTTP error: {e}"),
            ApiError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            ApiError::NotFound { message } => {
                write!(f, "not found: {}", message.as_deref().unwrap_or("no trips"))
            }
            ApiError::Service { status, message } => {
                write!(f, "API error {status}")?;
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Http(err)
    }
}

/// Only the service's own words reach the user; transport details stay
/// in the logs.
impl From<ApiError> for RequestFailed {
    fn from(err: ApiError) -> Self {
        RequestFailed {
            message: err.service_message().map(str::to_string),
        }
    }
}
