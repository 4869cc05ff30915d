//! Column value conversions shared by the repositories.
//!
//! Money is stored as decimal text and dates as `YYYY-MM-DD` text, so
//! lexical order matches calendar order and sums never pass through floats.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;
use ledgerly_core::constants::AMOUNT_DECIMAL_PRECISION;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a stored amount. Unparsable values are logged and read as zero.
pub fn parse_amount(value: &str, column: &str) -> Decimal {
    Decimal::from_str(value.trim()).unwrap_or_else(|e| {
        log::error!(
            "Failed to parse {} '{}' as decimal ({}); using 0",
            column,
            value,
            e
        );
        Decimal::ZERO
    })
}

pub fn format_amount(amount: Decimal) -> String {
    amount.round_dp(AMOUNT_DECIMAL_PRECISION).to_string()
}

/// Sums stored amounts in decimal arithmetic.
pub fn sum_amounts<I>(values: I, column: &str) -> Decimal
where
    I: IntoIterator<Item = String>,
{
    values
        .into_iter()
        .map(|value| parse_amount(&value, column))
        .sum()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str, column: &'static str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| StorageError::InvalidValue {
        column,
        value: value.to_string(),
    })
}

/// Parses a stored enum label through its `FromStr` implementation.
pub fn parse_label<T: FromStr>(value: &str, column: &'static str) -> Result<T, StorageError> {
    T::from_str(value).map_err(|_| StorageError::InvalidValue {
        column,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerly_core::transactions::Category;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_round_trip_keeps_two_places() {
        assert_eq!(format_amount(dec!(12.345)), "12.35");
        assert_eq!(parse_amount("12.35", "amount"), dec!(12.35));
    }

    #[test]
    fn test_unparsable_amount_reads_as_zero() {
        assert_eq!(parse_amount("abc", "amount"), Decimal::ZERO);
        assert_eq!(
            sum_amounts(vec!["1.10".to_string(), "oops".to_string(), "2".to_string()], "amount"),
            dec!(3.10)
        );
    }

    #[test]
    fn test_dates_sort_lexically() {
        let a = format_date(NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
        let b = format_date(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        assert!(a < b);
        assert_eq!(parse_date(&a, "date").unwrap().to_string(), "2025-01-09");
        assert!(parse_date("09/01/2025", "date").is_err());
    }

    #[test]
    fn test_parse_label() {
        let food: Category = parse_label("food", "category").unwrap();
        assert_eq!(food, Category::Food);
        assert!(parse_label::<Category>("groceries", "category").is_err());
    }
}
