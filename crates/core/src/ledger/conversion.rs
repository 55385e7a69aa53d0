//! Entry type conversion.
//!
//! Conversions follow a fixed graph:
//!
//! | from             | to                           |
//! |------------------|------------------------------|
//! | `expense`        | `asset_purchase`, `transfer` |
//! | `asset_purchase` | `expense`                    |
//! | `income`         | `repay`                      |
//! | `transfer`       | `expense`, `income`          |
//!
//! The amount of the new entry is the sum of the old debit legs. The debit
//! and credit account roles come from the old entry's single debit account
//! and single credit account unless the caller supplies hints. An entry
//! with several accounts on a side fails with `AmbiguousLines` when that
//! side's role has no hint.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;
use super::shape::{AssetPurchaseShape, EntryShape, ExpenseShape, IncomeShape, RepayShape, TransferShape};
use super::types::{EntryType, LineDraft, checked_sum};

/// Returns the types `from` may be converted into.
#[must_use]
pub const fn allowed_targets(from: EntryType) -> &'static [EntryType] {
    match from {
        EntryType::Expense => &[EntryType::AssetPurchase, EntryType::Transfer],
        EntryType::AssetPurchase => &[EntryType::Expense],
        EntryType::Income => &[EntryType::Repay],
        EntryType::Transfer => &[EntryType::Expense, EntryType::Income],
        _ => &[],
    }
}

/// Fails unless `from -> to` is an edge of the conversion graph.
///
/// # Errors
///
/// Returns `UnsupportedConversion` naming the allowed targets.
pub fn ensure_convertible(from: EntryType, to: EntryType) -> Result<(), LedgerError> {
    let allowed = allowed_targets(from);
    if allowed.contains(&to) {
        Ok(())
    } else {
        Err(LedgerError::UnsupportedConversion {
            from,
            to,
            allowed: allowed.to_vec(),
        })
    }
}

/// Caller overrides for the extracted account roles.
///
/// The debit role is the category of an expense, the receiving account of an
/// income, the destination of a transfer, the asset of a purchase, and the
/// liability of a repayment. The credit role is the other side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionHints {
    /// Account for the target's debit role.
    #[serde(default)]
    pub debit_account_id: Option<Uuid>,
    /// Account for the target's credit role.
    #[serde(default)]
    pub credit_account_id: Option<Uuid>,
}

/// Inputs resolved from the existing lines and the hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionInputs {
    /// Sum of the existing debit legs.
    pub amount: Decimal,
    /// Debit role account.
    pub debit_account_id: Uuid,
    /// Credit role account.
    pub credit_account_id: Uuid,
}

/// Extracts the amount and account roles from `lines`, applying `hints`.
///
/// # Errors
///
/// Returns `AmbiguousLines` when a role has no hint and its side does not
/// hold exactly one account, or `InvalidField` when the lines carry no debit
/// or their debits overflow.
pub fn resolve_inputs(
    lines: &[LineDraft],
    hints: ConversionHints,
) -> Result<ConversionInputs, LedgerError> {
    let amount = checked_sum(lines.iter().map(|l| l.debit))?;
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidField {
            field: "amount",
            reason: "existing entry has no debit amount to convert".to_string(),
        });
    }

    let debit_accounts: BTreeSet<Uuid> = lines
        .iter()
        .filter(|l| l.debit > Decimal::ZERO)
        .map(|l| l.account_id)
        .collect();
    let credit_accounts: BTreeSet<Uuid> = lines
        .iter()
        .filter(|l| l.credit > Decimal::ZERO)
        .map(|l| l.account_id)
        .collect();

    let ambiguous = || LedgerError::AmbiguousLines {
        debit_legs: debit_accounts.len(),
        credit_legs: credit_accounts.len(),
    };

    let debit_account_id = match hints.debit_account_id {
        Some(id) => id,
        None => single(&debit_accounts).ok_or_else(ambiguous)?,
    };
    let credit_account_id = match hints.credit_account_id {
        Some(id) => id,
        None => single(&credit_accounts).ok_or_else(ambiguous)?,
    };

    Ok(ConversionInputs {
        amount,
        debit_account_id,
        credit_account_id,
    })
}

fn single(accounts: &BTreeSet<Uuid>) -> Option<Uuid> {
    if accounts.len() == 1 {
        accounts.first().copied()
    } else {
        None
    }
}

/// Builds the target shape from resolved inputs.
///
/// # Errors
///
/// Returns `UnsupportedConversion` for targets that are never reachable.
pub fn target_shape(
    from: EntryType,
    target: EntryType,
    inputs: ConversionInputs,
) -> Result<EntryShape, LedgerError> {
    let ConversionInputs {
        amount,
        debit_account_id,
        credit_account_id,
    } = inputs;

    let shape = match target {
        EntryType::Expense => EntryShape::Expense(ExpenseShape {
            amount,
            category_account_id: debit_account_id,
            payment_account_id: credit_account_id,
        }),
        EntryType::Income => EntryShape::Income(IncomeShape {
            amount,
            category_account_id: credit_account_id,
            payment_account_id: debit_account_id,
        }),
        EntryType::Transfer => EntryShape::Transfer(TransferShape {
            amount,
            from_account_id: credit_account_id,
            to_account_id: debit_account_id,
        }),
        EntryType::AssetPurchase => EntryShape::AssetPurchase(AssetPurchaseShape {
            amount,
            asset_account_id: debit_account_id,
            payment_account_id: credit_account_id,
            financing: None,
        }),
        EntryType::Repay => EntryShape::Repay(RepayShape {
            principal: amount,
            interest: Decimal::ZERO,
            liability_account_id: debit_account_id,
            payment_account_id: credit_account_id,
            interest_account_id: None,
        }),
        _ => {
            return Err(LedgerError::UnsupportedConversion {
                from,
                to: target,
                allowed: allowed_targets(from).to_vec(),
            });
        }
    };
    Ok(shape)
}

/// Checks the graph, resolves inputs, and returns the shape to rebuild with.
///
/// # Errors
///
/// Returns `UnsupportedConversion`, `AmbiguousLines`, or `InvalidField`.
pub fn plan_conversion(
    from: EntryType,
    target: EntryType,
    lines: &[LineDraft],
    hints: ConversionHints,
) -> Result<EntryShape, LedgerError> {
    ensure_convertible(from, target)?;
    let inputs = resolve_inputs(lines, hints)?;
    target_shape(from, target, inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_graph_edges() {
        assert!(ensure_convertible(EntryType::Expense, EntryType::AssetPurchase).is_ok());
        assert!(ensure_convertible(EntryType::Expense, EntryType::Transfer).is_ok());
        assert!(ensure_convertible(EntryType::AssetPurchase, EntryType::Expense).is_ok());
        assert!(ensure_convertible(EntryType::Income, EntryType::Repay).is_ok());
        assert!(ensure_convertible(EntryType::Transfer, EntryType::Expense).is_ok());
        assert!(ensure_convertible(EntryType::Transfer, EntryType::Income).is_ok());
        assert!(ensure_convertible(EntryType::Expense, EntryType::Expense).is_err());
        assert!(ensure_convertible(EntryType::Repay, EntryType::Income).is_err());
    }

    #[test]
    fn test_expense_to_transfer_keeps_roles() {
        let food = Uuid::new_v4();
        let cash = Uuid::new_v4();
        let lines = vec![LineDraft::debit(food, dec!(50)), LineDraft::credit(cash, dec!(50))];

        let shape = plan_conversion(
            EntryType::Expense,
            EntryType::Transfer,
            &lines,
            ConversionHints::default(),
        )
        .unwrap();

        assert_eq!(
            shape,
            EntryShape::Transfer(TransferShape {
                amount: dec!(50),
                from_account_id: cash,
                to_account_id: food,
            })
        );
    }

    #[test]
    fn test_hints_override_extracted_roles() {
        let salary = Uuid::new_v4();
        let bank = Uuid::new_v4();
        let loan = Uuid::new_v4();
        let lines = vec![LineDraft::debit(bank, dec!(800)), LineDraft::credit(salary, dec!(800))];

        let shape = plan_conversion(
            EntryType::Income,
            EntryType::Repay,
            &lines,
            ConversionHints {
                debit_account_id: Some(loan),
                credit_account_id: Some(bank),
            },
        )
        .unwrap();

        let EntryShape::Repay(repay) = shape else {
            panic!("expected repay shape");
        };
        assert_eq!(repay.principal, dec!(800));
        assert_eq!(repay.liability_account_id, loan);
        assert_eq!(repay.payment_account_id, bank);
    }

    #[test]
    fn test_split_entry_fails_without_hint() {
        let asset = Uuid::new_v4();
        let cash = Uuid::new_v4();
        let loan = Uuid::new_v4();
        let lines = vec![
            LineDraft::debit(asset, dec!(100)),
            LineDraft::credit(cash, dec!(30)),
            LineDraft::credit(loan, dec!(70)),
        ];

        let result = plan_conversion(
            EntryType::AssetPurchase,
            EntryType::Expense,
            &lines,
            ConversionHints::default(),
        );
        assert!(matches!(
            result,
            Err(LedgerError::AmbiguousLines { debit_legs: 1, credit_legs: 2 })
        ));

        let shape = plan_conversion(
            EntryType::AssetPurchase,
            EntryType::Expense,
            &lines,
            ConversionHints {
                debit_account_id: None,
                credit_account_id: Some(cash),
            },
        )
        .unwrap();
        assert_eq!(shape.entry_type(), EntryType::Expense);
    }

    #[test]
    fn test_overflowing_debits_are_rejected() {
        let lines = vec![
            LineDraft::debit(Uuid::new_v4(), Decimal::MAX),
            LineDraft::debit(Uuid::new_v4(), Decimal::MAX),
            LineDraft::credit(Uuid::new_v4(), dec!(1)),
        ];
        assert!(matches!(
            resolve_inputs(&lines, ConversionHints::default()),
            Err(LedgerError::InvalidField { field: "amount", .. })
        ));
    }

    #[test]
    fn test_unsupported_is_checked_first() {
        let result = plan_conversion(
            EntryType::Borrow,
            EntryType::Expense,
            &[],
            ConversionHints::default(),
        );
        assert!(matches!(
            result,
            Err(LedgerError::UnsupportedConversion { allowed, .. }) if allowed.is_empty()
        ));
    }
}
