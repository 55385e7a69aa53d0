//! Property-based tests for the balance sheet identity.
//!
//! For any set of balanced entries over the household classes, assets equal
//! liabilities plus equity plus net income, at every cut-off.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::service::ReportService;
use super::types::AccountActivity;
use crate::chart::{AccountClass, BalanceDirection};

/// Accounts used by generated entries: one per class plus a contra asset.
fn accounts() -> Vec<AccountActivity> {
    let specs = [
        ("1001", AccountClass::Asset, BalanceDirection::Debit),
        ("1502", AccountClass::Asset, BalanceDirection::Credit),
        ("2001", AccountClass::Liability, BalanceDirection::Credit),
        ("3001", AccountClass::Equity, BalanceDirection::Credit),
        ("4001", AccountClass::Income, BalanceDirection::Credit),
        ("5001", AccountClass::Expense, BalanceDirection::Debit),
    ];
    specs
        .iter()
        .map(|(code, class, direction)| AccountActivity {
            account_id: Uuid::new_v4(),
            code: (*code).to_string(),
            name: (*code).to_string(),
            class: *class,
            direction: *direction,
            parent_id: None,
            sort_order: 0,
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
        })
        .collect()
}

/// (debit account index, credit account index, amount in cents, day offset)
fn posting() -> impl Strategy<Value = (usize, usize, i64, u32)> {
    (0usize..6, 0usize..6, 1i64..10_000_000, 0u32..90)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_balance_sheet_identity_holds(
        postings in prop::collection::vec(posting(), 0..40),
        cutoff in 0u32..90,
    ) {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let as_of = start + chrono::Days::new(u64::from(cutoff));
        let mut rows = accounts();

        for (debit, credit, cents, day) in postings {
            if day > cutoff {
                continue;
            }
            let amount = Decimal::new(cents, 2);
            rows[debit].total_debit += amount;
            rows[credit].total_credit += amount;
        }

        let sheet = ReportService::balance_sheet(as_of, rows);

        prop_assert!(sheet.is_balanced);
        prop_assert_eq!(sheet.total_assets, sheet.liabilities_and_equity);
        prop_assert_eq!(sheet.adjusted_equity, sheet.total_equity + sheet.net_income);
    }
}
