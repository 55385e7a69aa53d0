//! Ledger error types for validation and invariant errors.
//!
//! This module defines every error that can occur while building, validating,
//! mutating, or converting journal entries. Each error maps to one of the
//! shared [`ErrorKind`] classes.

use homebook_shared::{AppError, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::EntryType;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// A field required by the entry type is absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field is present but unusable.
    #[error("Invalid field {field}: {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Entry type outside the closed set.
    #[error("Unknown entry type: {0}")]
    UnknownEntryType(String),

    /// An entry must have at least 2 lines.
    #[error("Entry must have at least 2 lines")]
    InsufficientLines,

    /// Line amount is negative.
    #[error("Line {line}: amounts cannot be negative")]
    NegativeAmount {
        /// 1-based line number.
        line: usize,
    },

    /// Line amount has more than two decimal places.
    #[error("Line {line}: amounts may have at most 2 decimal places")]
    TooManyDecimals {
        /// 1-based line number.
        line: usize,
    },

    /// Line sets both debit and credit.
    #[error("Line {line}: specify either debit or credit, not both")]
    BothSides {
        /// 1-based line number.
        line: usize,
    },

    /// Line has neither debit nor credit.
    #[error("Line {line}: debit or credit must be non-zero")]
    ZeroLine {
        /// 1-based line number.
        line: usize,
    },

    /// Financed part of an asset purchase exceeds its total.
    #[error("Financed amount {financed} exceeds purchase total {total}")]
    FinancingExceedsTotal {
        /// Liability-funded amount.
        financed: Decimal,
        /// Purchase total.
        total: Decimal,
    },

    // ========== Invariant Errors ==========
    /// Entry is not balanced (debits != credits).
    #[error("Entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Account is inactive and cannot be used.
    #[error("Account {0} is inactive")]
    AccountInactive(Uuid),

    /// Account has active children and cannot receive postings.
    #[error("Account {0} is a non-leaf account and cannot receive postings")]
    NonLeafAccount(Uuid),

    /// Conversion pair outside the allowed graph.
    #[error(
        "Unsupported conversion from {from} to {to}; allowed targets: {}",
        join_types(.allowed)
    )]
    UnsupportedConversion {
        /// Current type.
        from: EntryType,
        /// Requested type.
        to: EntryType,
        /// Targets reachable from `from`.
        allowed: Vec<EntryType>,
    },

    /// Conversion could not pick a single debit or credit account.
    #[error(
        "Cannot infer accounts for conversion: entry has {debit_legs} debit and {credit_legs} credit accounts; supply explicit account hints"
    )]
    AmbiguousLines {
        /// Distinct accounts on the debit side.
        debit_legs: usize,
        /// Distinct accounts on the credit side.
        credit_legs: usize,
    },

    // ========== Not Found Errors ==========
    /// Book not found.
    #[error("Book not found: {0}")]
    BookNotFound(Uuid),

    /// Account not found in the book.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Entry not found in the book.
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),

    // ========== Conflict Errors ==========
    /// External id already used in this book.
    #[error("External id '{external_id}' is already used in this book")]
    DuplicateExternalId {
        /// The idempotency key.
        external_id: String,
        /// The entry that owns it, when known.
        entry_id: Option<Uuid>,
    },
}

fn join_types(types: &[EntryType]) -> String {
    if types.is_empty() {
        return "none".to_string();
    }
    types
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl LedgerError {
    /// An amount too large to be stored as minor units.
    pub(crate) fn out_of_range(field: &'static str) -> Self {
        Self::InvalidField {
            field,
            reason: "out of range".to_string(),
        }
    }

    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField(_)
            | Self::InvalidField { .. }
            | Self::UnknownEntryType(_)
            | Self::InsufficientLines
            | Self::NegativeAmount { .. }
            | Self::TooManyDecimals { .. }
            | Self::BothSides { .. }
            | Self::ZeroLine { .. }
            | Self::FinancingExceedsTotal { .. } => ErrorKind::Validation,
            Self::UnbalancedEntry { .. }
            | Self::AccountInactive(_)
            | Self::NonLeafAccount(_)
            | Self::UnsupportedConversion { .. }
            | Self::AmbiguousLines { .. } => ErrorKind::Invariant,
            Self::BookNotFound(_) | Self::AccountNotFound(_) | Self::EntryNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::DuplicateExternalId { .. } => ErrorKind::Conflict,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::UnknownEntryType(_) => "UNKNOWN_ENTRY_TYPE",
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::TooManyDecimals { .. } => "TOO_MANY_DECIMALS",
            Self::BothSides { .. } => "BOTH_SIDES_SET",
            Self::ZeroLine { .. } => "ZERO_LINE",
            Self::FinancingExceedsTotal { .. } => "FINANCING_EXCEEDS_TOTAL",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::NonLeafAccount(_) => "NON_LEAF_ACCOUNT",
            Self::UnsupportedConversion { .. } => "UNSUPPORTED_CONVERSION",
            Self::AmbiguousLines { .. } => "AMBIGUOUS_LINES",
            Self::BookNotFound(_) => "BOOK_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::DuplicateExternalId { .. } => "DUPLICATE_EXTERNAL_ID",
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

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
