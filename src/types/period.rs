//! Calendar periods used to window reports

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar-based report window anchored to "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum PeriodSpec {
    /// Same calendar month and year as today
    Month,

    /// Same calendar quarter (Jan-Mar, Apr-Jun, ...) and year as today
    Quarter,

    /// Same calendar year as today
    Year,

    /// Inclusive date range
    ///
    /// If either bound is missing the period matches every date.
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },

    /// Every date
    All,
}

impl PeriodSpec {
    /// Whether `date` falls inside this period as seen from `today`
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match *self {
            PeriodSpec::Month => date.year() == today.year() && date.month() == today.month(),
            PeriodSpec::Quarter => {
                date.year() == today.year() && quarter_of(date) == quarter_of(today)
            }
            PeriodSpec::Year => date.year() == today.year(),
            PeriodSpec::Custom {
                start: Some(start),
                end: Some(end),
            } => start <= date && date <= end,
            PeriodSpec::Custom { .. } | PeriodSpec::All => true,
        }
    }

    /// Whether this period lets every transaction through
    pub fn is_unbounded(&self) -> bool {
        matches!(
            self,
            PeriodSpec::All
                | PeriodSpec::Custom { start: None, .. }
                | PeriodSpec::Custom { end: None, .. }
        )
    }

    /// Heading used when exporting a report
    pub fn label(&self) -> &'static str {
        match self {
            PeriodSpec::Month => "This month",
            PeriodSpec::Quarter => "This quarter",
            PeriodSpec::Year => "This year",
            PeriodSpec::Custom { .. } => "Custom period",
            PeriodSpec::All => "All time",
        }
    }
}

/// Zero-based quarter of the year
fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    #[case::month_same(PeriodSpec::Month, d(2024, 6, 30), true)]
    #[case::month_other_month(PeriodSpec::Month, d(2024, 5, 31), false)]
    #[case::month_other_year(PeriodSpec::Month, d(2023, 6, 1), false)]
    #[case::quarter_start(PeriodSpec::Quarter, d(2024, 4, 1), true)]
    #[case::quarter_previous(PeriodSpec::Quarter, d(2024, 3, 31), false)]
    #[case::quarter_other_year(PeriodSpec::Quarter, d(2023, 5, 1), false)]
    #[case::year_same(PeriodSpec::Year, d(2024, 1, 1), true)]
    #[case::year_other(PeriodSpec::Year, d(2025, 1, 1), false)]
    #[case::all(PeriodSpec::All, d(1999, 1, 1), true)]
    fn test_contains_relative_to_today(
        #[case] period: PeriodSpec,
        #[case] date: NaiveDate,
        #[case] expected: bool,
    ) {
        let today = d(2024, 6, 15);
        assert_eq!(period.contains(date, today), expected);
    }

    #[rstest]
    #[case::on_start(d(2024, 1, 10), true)]
    #[case::on_end(d(2024, 1, 20), true)]
    #[case::before(d(2024, 1, 9), false)]
    #[case::after(d(2024, 1, 21), false)]
    fn test_custom_range_is_inclusive(#[case] date: NaiveDate, #[case] expected: bool) {
        let period = PeriodSpec::Custom {
            start: Some(d(2024, 1, 10)),
            end: Some(d(2024, 1, 20)),
        };
        assert_eq!(period.contains(date, d(2030, 1, 1)), expected);
    }

    #[rstest]
    #[case::no_start(PeriodSpec::Custom { start: None, end: Some(d(2024, 1, 1)) })]
    #[case::no_end(PeriodSpec::Custom { start: Some(d(2024, 1, 1)), end: None })]
    #[case::no_bounds(PeriodSpec::Custom { start: None, end: None })]
    fn test_custom_with_missing_bound_matches_everything(#[case] period: PeriodSpec) {
        assert!(period.is_unbounded());
        assert!(period.contains(d(1990, 1, 1), d(2024, 6, 1)));
        assert!(period.contains(d(2090, 1, 1), d(2024, 6, 1)));
    }
}
