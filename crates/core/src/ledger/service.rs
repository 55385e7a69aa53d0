//! Ledger service for entry validation.
//!
//! This module provides the core business logic for validating journal
//! entries before they are persisted to the database.

use homebook_shared::types::{has_money_scale, to_minor_units};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::shape::EntryShape;
use super::types::{EntryTotals, EntryType, LineDraft};

/// Information about an account needed for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    /// The account ID.
    pub id: Uuid,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether no active account names this one as parent.
    pub is_leaf: bool,
}

/// An entry that passed validation and is ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedEntry {
    /// Type recorded on the entry.
    pub entry_type: EntryType,
    /// Validated lines in posting order.
    pub lines: Vec<LineDraft>,
    /// Balanced totals.
    pub totals: EntryTotals,
}

/// Ledger service for entry validation.
///
/// This service contains pure business logic with no database dependencies.
/// Storage passes an account validator that resolves accounts inside its
/// own transaction.
pub struct LedgerService;

impl LedgerService {
    /// Builds and validates the lines of `shape`.
    ///
    /// Validation steps:
    /// 1. Builds lines with the shape's typed builder
    /// 2. Requires at least 2 lines
    /// 3. Validates each line's amounts
    /// 4. Resolves every account (exists in book, active, leaf)
    /// 5. Requires exact debit/credit equality
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if validation fails.
    pub fn prepare<A>(shape: &EntryShape, account_validator: A) -> Result<PreparedEntry, LedgerError>
    where
        A: Fn(Uuid) -> Result<AccountInfo, LedgerError>,
    {
        let lines = shape.build_lines()?;
        let totals = Self::validate_lines(&lines, account_validator)?;

        Ok(PreparedEntry {
            entry_type: shape.entry_type(),
            lines,
            totals,
        })
    }

    /// Validates a raw line-set.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if any line or account is invalid, or the lines do not balance.
    pub fn validate_lines<A>(
        lines: &[LineDraft],
        account_validator: A,
    ) -> Result<EntryTotals, LedgerError>
    where
        A: Fn(Uuid) -> Result<AccountInfo, LedgerError>,
    {
        if lines.len() < 2 {
            return Err(LedgerError::InsufficientLines);
        }

        for (index, line) in lines.iter().enumerate() {
            Self::validate_line_amounts(index + 1, line)?;

            let account = account_validator(line.account_id)?;
            if !account.is_active {
                return Err(LedgerError::AccountInactive(line.account_id));
            }
            if !account.is_leaf {
                return Err(LedgerError::NonLeafAccount(line.account_id));
            }
        }

        let totals = EntryTotals::of(lines)?;
        if !totals.is_balanced {
            return Err(LedgerError::UnbalancedEntry {
                debit: totals.total_debit,
                credit: totals.total_credit,
            });
        }

        Ok(totals)
    }

    /// Validates one line's amounts. `line` is 1-based.
    ///
    /// # Errors
    ///
    /// Returns an error for negative, over-precise, oversized, double-sided, or
    /// empty lines.
    pub fn validate_line_amounts(line: usize, draft: &LineDraft) -> Result<(), LedgerError> {
        if draft.debit < Decimal::ZERO || draft.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount { line });
        }
        if !has_money_scale(draft.debit) || !has_money_scale(draft.credit) {
            return Err(LedgerError::TooManyDecimals { line });
        }
        if to_minor_units(draft.debit).is_none() || to_minor_units(draft.credit).is_none() {
            return Err(LedgerError::out_of_range("amount"));
        }
        match (draft.debit.is_zero(), draft.credit.is_zero()) {
            (false, false) => Err(LedgerError::BothSides { line }),
            (true, true) => Err(LedgerError::ZeroLine { line }),
            _ => Ok(()),
        }
    }
}
