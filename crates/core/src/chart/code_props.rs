//! Property-based tests for account code generation.
//!
//! - Generated codes never collide with existing codes
//! - Generated codes stay inside their block or under their parent prefix
//! - The fallback sequence is never handed out to a regular child

use std::collections::HashSet;

use proptest::prelude::*;

use super::code::{FALLBACK_SEQUENCE, child_prefix, fallback_code, next_child_code, next_root_code};
use super::types::AccountClass;

fn class_strategy() -> impl Strategy<Value = AccountClass> {
    prop_oneof![
        Just(AccountClass::Asset),
        Just(AccountClass::Liability),
        Just(AccountClass::Equity),
        Just(AccountClass::Income),
        Just(AccountClass::Expense),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_root_code_is_fresh_and_in_block(
        class in class_strategy(),
        used in proptest::collection::hash_set(1u32..6000, 0..40),
    ) {
        let existing: Vec<String> = used
            .iter()
            .filter(|n| **n % 1000 != 999)
            .map(ToString::to_string)
            .collect();

        let code = next_root_code(class, existing.iter().map(String::as_str)).unwrap();
        let n: u32 = code.parse().unwrap();
        let base = class.code_block();

        prop_assert!(!existing.contains(&code));
        prop_assert!(n > base && n < base + 1000);
    }

    #[test]
    fn prop_child_code_is_fresh(
        parent in prop_oneof![Just("5001".to_string()), Just("1001-02".to_string())],
        seqs in proptest::collection::hash_set(1u32..99, 0..30),
        with_fallback in any::<bool>(),
    ) {
        let prefix = child_prefix(&parent);
        let mut existing: Vec<String> = seqs.iter().map(|s| format!("{prefix}{s:02}")).collect();
        if with_fallback {
            existing.push(fallback_code(&parent));
        }
        let taken: HashSet<&str> = existing.iter().map(String::as_str).collect();

        match next_child_code(&parent, existing.iter().map(String::as_str)) {
            Ok(code) => {
                prop_assert!(!taken.contains(code.as_str()));
                prop_assert!(code.starts_with(&prefix));
                let seq: u32 = code[prefix.len()..].parse().unwrap();
                prop_assert!(seq != FALLBACK_SEQUENCE);
            }
            Err(_) => prop_assert!(seqs.contains(&98)),
        }
    }
}
