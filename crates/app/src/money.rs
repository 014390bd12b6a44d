//! Monetary amounts.
//!
//! Amounts are [`Decimal`] with at most two fractional digits. Floating
//! point never touches a price.

use num_traits::ToPrimitive as _;
use rust_decimal::Decimal;
use thiserror::Error;

/// Fractional digits carried by every stored amount.
pub const MONEY_SCALE: u32 = 2;

const MINOR_UNITS_PER_MAJOR: Decimal = Decimal::ONE_HUNDRED;

/// 99,999,999.99: the largest unit price a `NUMERIC(10, 2)` column holds.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, MONEY_SCALE);

/// 9,999,999,999.99: the largest subtotal or total a `NUMERIC(12, 2)`
/// column holds.
pub const MAX_TOTAL: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, MONEY_SCALE);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount {0} has more than two fractional digits")]
    Fractional(Decimal),

    #[error("amount {0} does not fit in minor units")]
    Overflow(Decimal),
}

/// Convert a major-unit amount (e.g. dollars) to integer minor units
/// (e.g. cents) without rounding.
///
/// # Errors
///
/// Returns [`MoneyError::Fractional`] if the amount has sub-cent precision
/// and [`MoneyError::Overflow`] if the result does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Result<i64, MoneyError> {
    let minor = amount
        .checked_mul(MINOR_UNITS_PER_MAJOR)
        .ok_or(MoneyError::Overflow(amount))?;

    if !minor.fract().is_zero() {
        return Err(MoneyError::Fractional(amount));
    }

    minor.to_i64().ok_or(MoneyError::Overflow(amount))
}

/// Whether `amount` is a valid unit price: positive, at most
/// [`MAX_PRICE`], with at most two fractional digits.
#[must_use]
pub fn is_valid_price(amount: Decimal) -> bool {
    amount.is_sign_positive()
        && !amount.is_zero()
        && amount <= MAX_PRICE
        && amount.normalize().scale() <= MONEY_SCALE
}

/// Whether `amount` fits a subtotal or total column.
#[must_use]
pub fn fits_total(amount: Decimal) -> bool {
    amount <= MAX_TOTAL
}

/// Render an amount with exactly two fractional digits.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(MONEY_SCALE);

    rounded.rescale(MONEY_SCALE);

    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn converts_whole_and_fractional_amounts_exactly() -> TestResult {
        assert_eq!(to_minor_units(Decimal::from_str("25.00")?)?, 2500);
        assert_eq!(to_minor_units(Decimal::from_str("0.01")?)?, 1);
        assert_eq!(to_minor_units(Decimal::from_str("19.99")?)?, 1999);
        assert_eq!(to_minor_units(Decimal::from_str("7")?)?, 700);

        Ok(())
    }

    #[test]
    fn rejects_sub_cent_amounts() -> TestResult {
        let amount = Decimal::from_str("1.005")?;

        assert_eq!(to_minor_units(amount), Err(MoneyError::Fractional(amount)));

        Ok(())
    }

    #[test]
    fn rejects_amounts_beyond_i64() {
        assert!(matches!(
            to_minor_units(Decimal::MAX),
            Err(MoneyError::Overflow(_))
        ));
    }

    #[test]
    fn trailing_zeros_do_not_count_as_precision() -> TestResult {
        assert!(is_valid_price(Decimal::from_str("10.500")?));
        assert!(!is_valid_price(Decimal::from_str("10.505")?));
        assert!(!is_valid_price(Decimal::ZERO));
        assert!(!is_valid_price(Decimal::from_str("-1.00")?));

        Ok(())
    }

    #[test]
    fn limits_match_the_column_precision() -> TestResult {
        assert_eq!(MAX_PRICE, Decimal::from_str("99999999.99")?);
        assert_eq!(MAX_TOTAL, Decimal::from_str("9999999999.99")?);

        assert!(is_valid_price(MAX_PRICE));
        assert!(!is_valid_price(Decimal::from_str("100000000.00")?));

        assert!(fits_total(MAX_TOTAL));
        assert!(!fits_total(Decimal::from_str("10000000000.00")?));

        Ok(())
    }

    #[test]
    fn formats_with_two_digits() -> TestResult {
        assert_eq!(format_amount(Decimal::from_str("10")?), "10.00");
        assert_eq!(format_amount(Decimal::from_str("10.5")?), "10.50");
        assert_eq!(format_amount(Decimal::from_str("3.14")?), "3.14");

        Ok(())
    }
}
