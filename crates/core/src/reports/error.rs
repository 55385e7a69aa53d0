//! Report error types.

use chrono::NaiveDate;
use homebook_shared::{AppError, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Book not found.
    #[error("Book not found: {0}")]
    BookNotFound(Uuid),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Trend length outside the accepted range.
    #[error("Trend length must be between 1 and {max} months, got {months}")]
    InvalidMonths {
        /// Requested months.
        months: u32,
        /// Largest accepted value.
        max: u32,
    },
}

impl ReportError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BookNotFound(_) | Self::AccountNotFound(_) => ErrorKind::NotFound,
            Self::InvalidDateRange { .. } | Self::InvalidMonths { .. } => ErrorKind::Validation,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::BookNotFound(_) => "BOOK_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::InvalidMonths { .. } => "INVALID_MONTHS",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Invariant => 422,
            ErrorKind::Internal => 500,
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
