//! Batch ingestion error types.

use homebook_shared::{AppError, ErrorKind};
use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors that abort a whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Batch holds more items than allowed.
    #[error("Batch has {count} items; at most {max} are allowed")]
    TooManyItems {
        /// Items received.
        count: usize,
        /// Maximum accepted.
        max: usize,
    },

    /// One item failed and the batch was rolled back.
    #[error("item {position} failed: {source}")]
    ItemFailed {
        /// 1-based item position.
        position: usize,
        /// External id of the item, when present.
        external_id: Option<String>,
        /// Underlying ledger error.
        #[source]
        source: LedgerError,
    },
}

impl BatchError {
    /// Wraps a ledger error for the item at 0-based `index`.
    #[must_use]
    pub fn item(index: usize, external_id: Option<String>, source: LedgerError) -> Self {
        Self::ItemFailed {
            position: index + 1,
            external_id,
            source,
        }
    }

    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TooManyItems { .. } => ErrorKind::Validation,
            Self::ItemFailed { source, .. } => source.kind(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::TooManyItems { .. } => "BATCH_TOO_LARGE",
            Self::ItemFailed { source, .. } => source.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::TooManyItems { .. } => 400,
            Self::ItemFailed { source, .. } => source.http_status_code(),
        }
    }
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_item_failure_is_one_based() {
        let err = BatchError::item(2, Some("x3".into()), LedgerError::NonLeafAccount(Uuid::nil()));
        assert_eq!(
            err.to_string(),
            format!("item 3 failed: Account {} is a non-leaf account and cannot receive postings", Uuid::nil())
        );
        assert_eq!(err.error_code(), "NON_LEAF_ACCOUNT");
        assert_eq!(err.http_status_code(), 422);
    }

    #[test]
    fn test_too_many_items() {
        let err = BatchError::TooManyItems { count: 201, max: 200 };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(AppError::from(err), AppError::Validation(_)));
    }
}
