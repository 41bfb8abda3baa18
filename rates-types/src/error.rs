//! Error types for the exchange rate service.

use chrono::NaiveDate;

/// Domain-level errors (request date validation).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid date format")]
    InvalidDateFormat { input: String },

    #[error("Date out of range")]
    DateOutOfRange {
        date: NaiveDate,
        floor: NaiveDate,
        as_of: NaiveDate,
    },
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidDateFormat { .. } | DomainError::DateOutOfRange { .. } => {
                AppError::BadRequest(err.to_string())
            }
        }
    }
}
