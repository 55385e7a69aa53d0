//! Exact money helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts travel as `rust_decimal::Decimal` with at most two decimal places
//! and are persisted as integer minor units (cents).

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Number of decimal places a monetary amount may carry.
pub const MONEY_SCALE: u32 = 2;

/// Returns true if the amount has no more than [`MONEY_SCALE`] significant decimal places.
///
/// Trailing zeros are ignored, so `50.000` is accepted.
#[must_use]
pub fn has_money_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

/// Converts a decimal amount into integer minor units.
///
/// Returns `None` when the amount has too many decimal places or does not fit in an `i64`.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    if !has_money_scale(amount) {
        return None;
    }
    amount.checked_mul(Decimal::ONE_HUNDRED)?.to_i64()
}

/// Converts integer minor units back into a decimal amount with scale 2.
#[must_use]
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MONEY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(50), Some(5000))]
    #[case(dec!(50.00), Some(5000))]
    #[case(dec!(0.01), Some(1))]
    #[case(dec!(1234.5), Some(123_450))]
    #[case(dec!(-12.34), Some(-1234))]
    #[case(dec!(50.000), Some(5000))]
    #[case(dec!(0.001), None)]
    #[case(dec!(10.125), None)]
    fn test_to_minor_units(#[case] amount: Decimal, #[case] expected: Option<i64>) {
        assert_eq!(to_minor_units(amount), expected);
    }

    #[test]
    fn test_from_minor_units() {
        assert_eq!(from_minor_units(5000), dec!(50.00));
        assert_eq!(from_minor_units(1), dec!(0.01));
        assert_eq!(from_minor_units(0), Decimal::ZERO);
        assert_eq!(from_minor_units(5000).scale(), MONEY_SCALE);
    }

    #[test]
    fn test_minor_units_survive_storage() {
        let amount = dec!(987654.32);
        let minor = to_minor_units(amount).unwrap();
        assert_eq!(from_minor_units(minor), amount);
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert_eq!(to_minor_units(Decimal::MAX), None);
    }
}
