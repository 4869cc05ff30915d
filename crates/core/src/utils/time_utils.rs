use chrono::{Datelike, NaiveDate, Utc};

use crate::errors::{Error, Result};

/// Today's calendar date. Savings-goal status and default report years are
/// derived from this.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Current calendar year.
pub fn current_year() -> i32 {
    today().year()
}

/// Returns `(year, month)` of the month following the given one,
/// wrapping December into January of the next year.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// First day of the given month. `month` is 1-based.
pub fn month_start(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::invalid_input(format!("Invalid month {}-{}", year, month)))
}

/// Half-open bounds `[first day, first day of next month)` of the given month.
pub fn month_bounds_exclusive(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let start = month_start(year, month)?;
    let (next_year, next) = next_month(year, month);
    let end = month_start(next_year, next)?;
    Ok((start, end))
}

/// Last calendar day of the given month.
pub fn month_end(year: i32, month: u32) -> Result<NaiveDate> {
    let (_, end_exclusive) = month_bounds_exclusive(year, month)?;
    end_exclusive
        .pred_opt()
        .ok_or_else(|| Error::invalid_input(format!("Invalid month {}-{}", year, month)))
}

/// Calendar year bounds, both inclusive.
pub fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let start = month_start(year, 1)?;
    let end = month_end(year, 12)?;
    Ok((start, end))
}

/// Every `(year, month)` pair touched by the inclusive date range.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    if start > end {
        return months;
    }
    let (mut year, mut month) = (start.year(), start.month());
    let last = (end.year(), end.month());
    loop {
        months.push((year, month));
        if (year, month) == last {
            break;
        }
        (year, month) = next_month(year, month);
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn next_month_wraps_december() {
        assert_eq!(next_month(2024, 12), (2025, 1));
        assert_eq!(next_month(2025, 1), (2025, 2));
    }

    #[test]
    fn month_bounds_are_half_open() {
        let (start, end) = month_bounds_exclusive(2025, 12).unwrap();
        assert_eq!(start, date(2025, 12, 1));
        assert_eq!(end, date(2026, 1, 1));
    }

    #[test]
    fn month_end_handles_leap_years() {
        assert_eq!(month_end(2024, 2).unwrap(), date(2024, 2, 29));
        assert_eq!(month_end(2025, 2).unwrap(), date(2025, 2, 28));
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(month_start(2025, 13).is_err());
        assert!(month_start(2025, 0).is_err());
    }

    #[test]
    fn months_between_spans_year_boundary() {
        let months = months_between(date(2024, 11, 15), date(2025, 2, 1));
        assert_eq!(months, vec![(2024, 11), (2024, 12), (2025, 1), (2025, 2)]);
        assert!(months_between(date(2025, 2, 1), date(2025, 1, 1)).is_empty());
    }
}
