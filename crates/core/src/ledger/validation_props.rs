//! Property-based tests for line validation.
//!
//! - Balanced line-sets on active leaf accounts are accepted
//! - Any debit/credit mismatch is rejected with the exact totals
//! - A single non-leaf account poisons the whole entry

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::service::{AccountInfo, LedgerService};
use super::types::LineDraft;

/// Strategy to generate positive amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn leaf(id: Uuid) -> Result<AccountInfo, LedgerError> {
    Ok(AccountInfo {
        id,
        is_active: true,
        is_leaf: true,
    })
}

/// Debit legs from `amounts`, balanced by a single credit leg.
fn balanced(amounts: &[Decimal]) -> Vec<LineDraft> {
    let total: Decimal = amounts.iter().copied().sum();
    let mut lines: Vec<LineDraft> = amounts
        .iter()
        .map(|amount| LineDraft::debit(Uuid::new_v4(), *amount))
        .collect();
    lines.push(LineDraft::credit(Uuid::new_v4(), total));
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_balanced_entries_accepted(
        amounts in prop::collection::vec(positive_amount(), 1..8),
    ) {
        let lines = balanced(&amounts);
        let totals = LedgerService::validate_lines(&lines, leaf).unwrap();

        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.total_debit, totals.total_credit);
    }

    #[test]
    fn prop_unbalanced_entries_rejected(
        amounts in prop::collection::vec(positive_amount(), 1..8),
        drift in positive_amount(),
    ) {
        let mut lines = balanced(&amounts);
        let last = lines.len() - 1;
        lines[last].credit += drift;

        let result = LedgerService::validate_lines(&lines, leaf);
        match result {
            Err(LedgerError::UnbalancedEntry { debit, credit }) => {
                prop_assert_eq!(credit - debit, drift);
            }
            other => prop_assert!(false, "expected UnbalancedEntry, got {:?}", other),
        }
    }

    #[test]
    fn prop_non_leaf_account_rejected(
        amounts in prop::collection::vec(positive_amount(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let lines = balanced(&amounts);
        let parent = lines[pick.index(lines.len())].account_id;

        let result = LedgerService::validate_lines(&lines, |id| {
            Ok(AccountInfo {
                id,
                is_active: true,
                is_leaf: id != parent,
            })
        });

        prop_assert!(matches!(result, Err(LedgerError::NonLeafAccount(id)) if id == parent));
    }

    #[test]
    fn prop_sub_cent_amounts_rejected(
        cents in 1i64..1_000_000i64,
        extra in 1i64..10i64,
    ) {
        let amount = Decimal::new(cents * 10 + extra, 3);
        let line = LineDraft::debit(Uuid::new_v4(), amount);

        let rejected = matches!(
            LedgerService::validate_line_amounts(1, &line),
            Err(LedgerError::TooManyDecimals { line: 1 })
        );
        prop_assert!(rejected);
    }
}
