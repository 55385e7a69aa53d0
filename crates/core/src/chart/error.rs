//! Chart of accounts error types.

use homebook_shared::{AppError, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

use super::types::AccountClass;

/// Errors raised while creating, migrating, or deactivating accounts.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Unknown account class name.
    #[error("Unknown account class: {0}")]
    UnknownClass(String),

    /// Unknown balance direction name.
    #[error("Unknown balance direction: {0}")]
    UnknownDirection(String),

    /// Account name is blank.
    #[error("Account name must not be empty")]
    EmptyName,

    /// Book not found.
    #[error("Book not found: {0}")]
    BookNotFound(Uuid),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// Parent account belongs to a different book.
    #[error("Parent account {0} belongs to a different book")]
    ParentWrongBook(Uuid),

    /// Parent account is inactive.
    #[error("Parent account {0} is inactive")]
    ParentInactive(Uuid),

    /// Child class differs from its parent.
    #[error("Child account class {child} does not match parent class {parent}")]
    ClassMismatch {
        /// Parent class.
        parent: AccountClass,
        /// Requested child class.
        child: AccountClass,
    },

    /// No free code left under a prefix.
    #[error("No free account code left under '{prefix}'")]
    CodeSpaceExhausted {
        /// Block base or parent prefix that is full.
        prefix: String,
    },

    /// Account code already taken in the book.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Account still has journal lines.
    #[error("Cannot deactivate account {account_id}: it has {count} journal lines")]
    HasPostings {
        /// Account being deactivated.
        account_id: Uuid,
        /// Number of lines referencing it.
        count: u64,
    },

    /// Account still has active children.
    #[error("Cannot deactivate account {account_id}: it has {count} active child accounts")]
    HasActiveChildren {
        /// Account being deactivated.
        account_id: Uuid,
        /// Number of active children.
        count: u64,
    },
}

impl ChartError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownClass(_)
            | Self::UnknownDirection(_)
            | Self::EmptyName
            | Self::ClassMismatch { .. } => ErrorKind::Validation,
            Self::BookNotFound(_) | Self::AccountNotFound(_) | Self::ParentNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::ParentWrongBook(_)
            | Self::ParentInactive(_)
            | Self::CodeSpaceExhausted { .. }
            | Self::HasPostings { .. }
            | Self::HasActiveChildren { .. } => ErrorKind::Invariant,
            Self::DuplicateCode(_) => ErrorKind::Conflict,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownClass(_) => "UNKNOWN_ACCOUNT_CLASS",
            Self::UnknownDirection(_) => "UNKNOWN_BALANCE_DIRECTION",
            Self::EmptyName => "EMPTY_ACCOUNT_NAME",
            Self::BookNotFound(_) => "BOOK_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::ParentWrongBook(_) => "PARENT_WRONG_BOOK",
            Self::ParentInactive(_) => "PARENT_INACTIVE",
            Self::ClassMismatch { .. } => "ACCOUNT_CLASS_MISMATCH",
            Self::CodeSpaceExhausted { .. } => "CODE_SPACE_EXHAUSTED",
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::HasPostings { .. } => "ACCOUNT_HAS_POSTINGS",
            Self::HasActiveChildren { .. } => "ACCOUNT_HAS_ACTIVE_CHILDREN",
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

impl From<ChartError> for AppError {
    fn from(err: ChartError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
