//! Property-based tests for entry type conversion.
//!
//! - Every pair outside the conversion graph is rejected
//! - Converting a simple two-line entry preserves amount and balance

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::conversion::{ConversionHints, allowed_targets, ensure_convertible, plan_conversion};
use super::error::LedgerError;
use super::types::{EntryTotals, EntryType, LineDraft};

fn entry_type_strategy() -> impl Strategy<Value = EntryType> {
    prop::sample::select(EntryType::ALL.to_vec())
}

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_graph_is_closed(from in entry_type_strategy(), to in entry_type_strategy()) {
        let allowed = allowed_targets(from).contains(&to);
        match ensure_convertible(from, to) {
            Ok(()) => prop_assert!(allowed),
            Err(LedgerError::UnsupportedConversion { allowed: targets, .. }) => {
                prop_assert!(!allowed);
                prop_assert_eq!(targets.as_slice(), allowed_targets(from));
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn prop_conversion_preserves_amount(
        from in entry_type_strategy(),
        amount in positive_amount(),
    ) {
        let debit = Uuid::new_v4();
        let credit = Uuid::new_v4();
        let lines = vec![LineDraft::debit(debit, amount), LineDraft::credit(credit, amount)];

        for &to in allowed_targets(from) {
            let shape = plan_conversion(from, to, &lines, ConversionHints::default()).unwrap();
            let rebuilt = shape.build_lines().unwrap();
            let totals = EntryTotals::of(&rebuilt).unwrap();

            prop_assert_eq!(shape.entry_type(), to);
            prop_assert!(totals.is_balanced);
            prop_assert_eq!(totals.total_debit, amount);
        }
    }
}
