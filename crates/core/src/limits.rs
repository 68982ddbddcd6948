//! Magnitude limits applied where amounts and rates enter the system.
//!
//! Every forecast and roll-forward computed from inputs inside these limits
//! stays within `Decimal` range. The engines themselves assume no bound.

use rust_decimal::Decimal;

/// Exclusive bound on the magnitude of a currency amount (16 integer digits).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_874_919_424, 2_328_306, 0, false, 0);

/// Largest accepted forecast rate (1000%).
pub const MAX_RATE: Decimal = Decimal::TEN;

/// Decimal places allowed in a currency amount.
pub const AMOUNT_DP: u32 = 2;

/// Returns true if `amount` has fewer than 17 integer digits.
#[must_use]
pub fn amount_in_range(amount: Decimal) -> bool {
    amount.abs() < MAX_AMOUNT
}

/// Returns true if `amount` has at most two decimal places.
#[must_use]
pub fn is_currency_precision(amount: Decimal) -> bool {
    amount.normalize().scale() <= AMOUNT_DP
}

/// Returns true if `rate` lies in `0..=MAX_RATE`.
#[must_use]
pub fn rate_in_range(rate: Decimal) -> bool {
    (Decimal::ZERO..=MAX_RATE).contains(&rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_max_amount_is_ten_quadrillion() {
        assert_eq!(MAX_AMOUNT, dec!(10000000000000000));
        assert!(amount_in_range(dec!(9999999999999999.99)));
        assert!(amount_in_range(dec!(-9999999999999999.99)));
        assert!(!amount_in_range(MAX_AMOUNT));
    }

    #[test]
    fn test_currency_precision_ignores_trailing_zeros() {
        assert!(is_currency_precision(dec!(12.50)));
        assert!(is_currency_precision(dec!(12.5000)));
        assert!(!is_currency_precision(dec!(12.505)));
        assert!(!is_currency_precision(dec!(0.0000000000000000000000000001)));
    }

    #[test]
    fn test_rate_range() {
        assert!(rate_in_range(Decimal::ZERO));
        assert!(rate_in_range(dec!(3.5)));
        assert!(rate_in_range(MAX_RATE));
        assert!(!rate_in_range(dec!(10.0001)));
        assert!(!rate_in_range(dec!(-0.01)));
    }
}
