//! Domain error types.
//!
//! These errors represent validation failures of user-supplied values.
//! They are distinct from API/IO errors.

/// Domain-level errors for validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Date field is not `YYYY-MM-DD`
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Time field is not `HH:MM` or `HH:MM:SS`
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// Coordinate is not finite or out of range
    #[error("invalid coordinate: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidDate("2024-13-01".into());
        assert_eq!(err.to_string(), "invalid date: 2024-13-01");

        let err = DomainError::InvalidTime("25:00".into());
        assert_eq!(err.to_string(), "invalid time: 25:00");

        let err = DomainError::InvalidCoordinate {
            lat: 91.0,
            lng: 0.0,
        };
        assert_eq!(err.to_string(), "invalid coordinate: lat 91, lng 0");
    }
}
