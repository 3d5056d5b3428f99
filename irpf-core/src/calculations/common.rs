//! Shared helpers used across the calculation stages.

use rust_decimal::Decimal;

/// Rounds a value to cents using half-up rounding.
///
/// Values at exactly half a cent round away from zero, following the
/// usual convention for currency amounts.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpf_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpf_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(a: Decimal, b: Decimal) -> Decimal {
    if a > b { a } else { b }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(10.114));

        assert_eq!(result, dec!(10.11));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(10.115));

        assert_eq!(result, dec!(10.12));
    }

    #[test]
    fn round_half_up_rounds_negative_values_away_from_zero() {
        let result = round_half_up(dec!(-10.115));

        assert_eq!(result, dec!(-10.12));
    }

    #[test]
    fn round_half_up_preserves_already_rounded_values() {
        let result = round_half_up(dec!(10.11));

        assert_eq!(result, dec!(10.11));
    }

    #[test]
    fn round_half_up_handles_zero() {
        let result = round_half_up(dec!(0));

        assert_eq!(result, dec!(0.00));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        let result = max(dec!(100.00), dec!(200.00));

        assert_eq!(result, dec!(200.00));
    }

    #[test]
    fn max_handles_equal_values() {
        let result = max(dec!(150.00), dec!(150.00));

        assert_eq!(result, dec!(150.00));
    }

    #[test]
    fn max_handles_negative_and_positive() {
        let result = max(dec!(-50.00), dec!(50.00));

        assert_eq!(result, dec!(50.00));
    }
}
