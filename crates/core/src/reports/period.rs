//! Report period resolution.

use chrono::Datelike;

use super::reports_model::{ReportPeriod, ReportRequest, ReportType};
use crate::errors::{Error, Result};
use crate::utils::time_utils::{month_end, month_start, months_between, year_bounds};

/// How trend series are bucketed for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendGranularity {
    Day,
    Month,
}

impl ReportPeriod {
    /// Resolves inclusive bounds for a report request. `current_year` fills
    /// in a missing year.
    pub fn resolve(request: &ReportRequest, current_year: i32) -> Result<Self> {
        let year = request.year.unwrap_or(current_year);
        let (start, end) = match request.report_type {
            ReportType::Monthly => {
                let month = request.month.ok_or_else(|| {
                    Error::invalid_input("Month is required for monthly reports")
                })?;
                if !(1..=12).contains(&month) {
                    return Err(Error::invalid_input(format!(
                        "Month must be between 1 and 12, got {}",
                        month
                    )));
                }
                (month_start(year, month)?, month_end(year, month)?)
            }
            ReportType::HalfYearly => match request.half.unwrap_or(1) {
                1 => (month_start(year, 1)?, month_end(year, 6)?),
                2 => (month_start(year, 7)?, month_end(year, 12)?),
                other => {
                    return Err(Error::invalid_input(format!(
                        "Half must be 1 or 2, got {}",
                        other
                    )))
                }
            },
            ReportType::Yearly => year_bounds(year)?,
        };

        Ok(ReportPeriod {
            report_type: request.report_type,
            start,
            end,
        })
    }

    pub fn trend_granularity(&self) -> TrendGranularity {
        match self.report_type {
            ReportType::Monthly => TrendGranularity::Day,
            ReportType::HalfYearly | ReportType::Yearly => TrendGranularity::Month,
        }
    }

    /// `(year, month)` pairs covered by the period.
    pub fn months(&self) -> Vec<(i32, u32)> {
        months_between(self.start, self.end)
    }

    pub fn years(&self) -> Vec<i32> {
        (self.start.year()..=self.end.year()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(report_type: ReportType, month: Option<u32>, half: Option<u32>) -> ReportRequest {
        ReportRequest {
            report_type,
            month,
            year: Some(2024),
            half,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_covers_whole_month() {
        let period =
            ReportPeriod::resolve(&request(ReportType::Monthly, Some(2), None), 2030).unwrap();
        assert_eq!(period.start, date(2024, 2, 1));
        assert_eq!(period.end, date(2024, 2, 29));
        assert_eq!(period.trend_granularity(), TrendGranularity::Day);
    }

    #[test]
    fn monthly_requires_valid_month() {
        assert!(matches!(
            ReportPeriod::resolve(&request(ReportType::Monthly, None, None), 2024),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            ReportPeriod::resolve(&request(ReportType::Monthly, Some(13), None), 2024),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn half_yearly_bounds() {
        let first =
            ReportPeriod::resolve(&request(ReportType::HalfYearly, None, None), 2024).unwrap();
        assert_eq!((first.start, first.end), (date(2024, 1, 1), date(2024, 6, 30)));

        let second =
            ReportPeriod::resolve(&request(ReportType::HalfYearly, None, Some(2)), 2024).unwrap();
        assert_eq!((second.start, second.end), (date(2024, 7, 1), date(2024, 12, 31)));
        assert_eq!(second.months().len(), 6);

        assert!(matches!(
            ReportPeriod::resolve(&request(ReportType::HalfYearly, None, Some(3)), 2024),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn year_defaults_to_current() {
        let req = ReportRequest {
            report_type: ReportType::Yearly,
            month: None,
            year: None,
            half: None,
        };
        let period = ReportPeriod::resolve(&req, 2031).unwrap();
        assert_eq!((period.start, period.end), (date(2031, 1, 1), date(2031, 12, 31)));
        assert_eq!(period.trend_granularity(), TrendGranularity::Month);
    }
}
