//! Canonical entry shapes and their line builders.
//!
//! Each variant of [`EntryShape`] carries exactly the fields its builder needs.
//! `build_lines` turns a shape into the debit/credit lines that get validated
//! and posted.

use homebook_shared::types::{has_money_scale, to_minor_units};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{EntryType, LineDraft};

/// Spending: debit the category, credit the funding account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseShape {
    /// Amount spent.
    pub amount: Decimal,
    /// Expense category.
    pub category_account_id: Uuid,
    /// Funding account.
    pub payment_account_id: Uuid,
}

/// Earning: debit the receiving account, credit the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeShape {
    /// Amount received.
    pub amount: Decimal,
    /// Income category.
    pub category_account_id: Uuid,
    /// Receiving account.
    pub payment_account_id: Uuid,
}

/// Move money between two balance-sheet accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferShape {
    /// Amount moved.
    pub amount: Decimal,
    /// Credited account.
    pub from_account_id: Uuid,
    /// Debited account.
    pub to_account_id: Uuid,
}

/// Liability leg of a part-financed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Financing {
    /// Liability credited for the financed part.
    pub liability_account_id: Uuid,
    /// Financed amount.
    pub amount: Decimal,
}

/// Buy an asset, optionally part-financed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPurchaseShape {
    /// Full purchase price.
    pub amount: Decimal,
    /// Asset debited.
    pub asset_account_id: Uuid,
    /// Funding account for the unfinanced part.
    pub payment_account_id: Uuid,
    /// Optional liability-funded part.
    pub financing: Option<Financing>,
}

/// Borrow money into a funding account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowShape {
    /// Amount borrowed.
    pub amount: Decimal,
    /// Account receiving the money.
    pub payment_account_id: Uuid,
    /// Liability credited.
    pub liability_account_id: Uuid,
}

/// Repay a loan, splitting principal and interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepayShape {
    /// Principal part.
    pub principal: Decimal,
    /// Interest part.
    pub interest: Decimal,
    /// Liability being reduced.
    pub liability_account_id: Uuid,
    /// Funding account.
    pub payment_account_id: Uuid,
    /// Expense account for interest; the liability itself when absent.
    pub interest_account_id: Option<Uuid>,
}

/// Caller-supplied lines, for manual posts and calculator-driven types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinesShape {
    /// Type recorded on the entry.
    pub entry_type: EntryType,
    /// Raw lines.
    pub lines: Vec<LineDraft>,
}

/// A canonical entry shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum EntryShape {
    /// See [`ExpenseShape`].
    Expense(ExpenseShape),
    /// See [`IncomeShape`].
    Income(IncomeShape),
    /// See [`TransferShape`].
    Transfer(TransferShape),
    /// See [`AssetPurchaseShape`].
    AssetPurchase(AssetPurchaseShape),
    /// See [`BorrowShape`].
    Borrow(BorrowShape),
    /// See [`RepayShape`].
    Repay(RepayShape),
    /// See [`LinesShape`].
    Lines(LinesShape),
}

impl EntryShape {
    /// A manual entry with raw lines.
    #[must_use]
    pub const fn manual(lines: Vec<LineDraft>) -> Self {
        Self::Lines(LinesShape {
            entry_type: EntryType::Manual,
            lines,
        })
    }

    /// Raw lines recorded under any entry type.
    #[must_use]
    pub const fn lines(entry_type: EntryType, lines: Vec<LineDraft>) -> Self {
        Self::Lines(LinesShape { entry_type, lines })
    }

    /// The entry type this shape posts as.
    #[must_use]
    pub const fn entry_type(&self) -> EntryType {
        match self {
            Self::Expense(_) => EntryType::Expense,
            Self::Income(_) => EntryType::Income,
            Self::Transfer(_) => EntryType::Transfer,
            Self::AssetPurchase(_) => EntryType::AssetPurchase,
            Self::Borrow(_) => EntryType::Borrow,
            Self::Repay(_) => EntryType::Repay,
            Self::Lines(shape) => shape.entry_type,
        }
    }

    /// Computes the line-set for this shape.
    ///
    /// Raw lines are returned as given; their per-line rules are enforced by
    /// [`LedgerService`](super::service::LedgerService).
    ///
    /// # Errors
    ///
    /// Returns a validation error for non-positive or over-precise amounts,
    /// identical transfer endpoints, or financing above the purchase total.
    pub fn build_lines(&self) -> Result<Vec<LineDraft>, LedgerError> {
        match self {
            Self::Expense(s) => {
                let amount = positive("amount", s.amount)?;
                Ok(vec![
                    LineDraft::debit(s.category_account_id, amount),
                    LineDraft::credit(s.payment_account_id, amount),
                ])
            }
            Self::Income(s) => {
                let amount = positive("amount", s.amount)?;
                Ok(vec![
                    LineDraft::debit(s.payment_account_id, amount),
                    LineDraft::credit(s.category_account_id, amount),
                ])
            }
            Self::Transfer(s) => {
                let amount = positive("amount", s.amount)?;
                if s.from_account_id == s.to_account_id {
                    return Err(LedgerError::InvalidField {
                        field: "to_account_id",
                        reason: "must differ from from_account_id".to_string(),
                    });
                }
                Ok(vec![
                    LineDraft::debit(s.to_account_id, amount),
                    LineDraft::credit(s.from_account_id, amount),
                ])
            }
            Self::AssetPurchase(s) => Self::asset_purchase_lines(s),
            Self::Borrow(s) => {
                let amount = positive("amount", s.amount)?;
                Ok(vec![
                    LineDraft::debit(s.payment_account_id, amount),
                    LineDraft::credit(s.liability_account_id, amount),
                ])
            }
            Self::Repay(s) => Self::repay_lines(s),
            Self::Lines(s) => Ok(s.lines.clone()),
        }
    }

    fn asset_purchase_lines(s: &AssetPurchaseShape) -> Result<Vec<LineDraft>, LedgerError> {
        let amount = positive("amount", s.amount)?;
        let mut lines = vec![LineDraft::debit(s.asset_account_id, amount)];

        let financed = match &s.financing {
            Some(financing) => {
                let financed = positive("extra_liability_amount", financing.amount)?;
                if financed > amount {
                    return Err(LedgerError::FinancingExceedsTotal {
                        financed,
                        total: amount,
                    });
                }
                financed
            }
            None => Decimal::ZERO,
        };

        let paid = amount - financed;
        if paid > Decimal::ZERO {
            lines.push(LineDraft::credit(s.payment_account_id, paid));
        }
        if let Some(financing) = &s.financing {
            lines.push(LineDraft::credit(financing.liability_account_id, financed));
        }
        Ok(lines)
    }

    fn repay_lines(s: &RepayShape) -> Result<Vec<LineDraft>, LedgerError> {
        let principal = non_negative("principal", s.principal)?;
        let interest = non_negative("interest", s.interest)?;
        let total = principal
            .checked_add(interest)
            .ok_or_else(|| LedgerError::out_of_range("principal"))?;
        if total <= Decimal::ZERO {
            return Err(LedgerError::InvalidField {
                field: "principal",
                reason: "principal plus interest must be greater than zero".to_string(),
            });
        }

        let mut lines = Vec::with_capacity(3);
        if principal > Decimal::ZERO {
            lines.push(
                LineDraft::debit(s.liability_account_id, principal).with_description("principal"),
            );
        }
        if interest > Decimal::ZERO {
            let target = s.interest_account_id.unwrap_or(s.liability_account_id);
            lines.push(LineDraft::debit(target, interest).with_description("interest"));
        }
        lines.push(LineDraft::credit(s.payment_account_id, total));
        Ok(lines)
    }
}

fn non_negative(field: &'static str, amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::InvalidField {
            field,
            reason: "must not be negative".to_string(),
        });
    }
    if !has_money_scale(amount) {
        return Err(LedgerError::InvalidField {
            field,
            reason: "must have at most 2 decimal places".to_string(),
        });
    }
    if to_minor_units(amount).is_none() {
        return Err(LedgerError::out_of_range(field));
    }
    Ok(amount)
}

fn positive(field: &'static str, amount: Decimal) -> Result<Decimal, LedgerError> {
    let amount = non_negative(field, amount)?;
    if amount.is_zero() {
        return Err(LedgerError::InvalidField {
            field,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(amount)
}
