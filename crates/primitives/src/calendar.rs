//! Month-granular calendar arithmetic.
//!
//! Every stage of the pipeline keys its records by calendar month rather than
//! by day, so month shifts are plain integer arithmetic. `shift` saturates at
//! the ends of the `i32` month range; `checked_shift` reports overflow.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, Months};
use serde::{Deserialize, Serialize};

use crate::Date;

/// A calendar month.
///
/// Ordering is chronological (year first, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a new month, returning `None` if `month` is not in `1..=12`.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month >= 1 && month <= 12 { Some(Self { year, month }) } else { None }
    }

    /// Create a new month, clamping `month` into `1..=12`.
    #[must_use]
    pub const fn clamped(year: i32, month: u32) -> Self {
        let month = if month < 1 {
            1
        } else if month > 12 {
            12
        } else {
            month
        };
        Self { year, month }
    }

    /// Month containing the given date.
    #[must_use]
    pub fn from_date(date: Date) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    /// Parse a `YYYYMM` integer such as `196307`.
    #[must_use]
    pub fn from_yyyymm(value: i64) -> Option<Self> {
        let year = i32::try_from(value / 100).ok()?;
        let month = u32::try_from(value % 100).ok()?;
        Self::new(year, month)
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month in `1..=12`.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Shift by a signed number of months, saturating on overflow.
    #[must_use]
    pub const fn shift(&self, months: i32) -> Self {
        let index = self.year.saturating_mul(12).saturating_add(self.month as i32 - 1);
        Self::from_index(index.saturating_add(months))
    }

    /// Shift by a signed number of months, returning `None` on overflow.
    #[must_use]
    pub const fn checked_shift(&self, months: i32) -> Option<Self> {
        let Some(base) = self.year.checked_mul(12) else {
            return None;
        };
        let Some(index) = base.checked_add(self.month as i32 - 1) else {
            return None;
        };
        match index.checked_add(months) {
            Some(index) => Some(Self::from_index(index)),
            None => None,
        }
    }

    const fn from_index(index: i32) -> Self {
        Self { year: index.div_euclid(12), month: index.rem_euclid(12) as u32 + 1 }
    }

    /// The immediately preceding month.
    #[must_use]
    pub const fn prev(&self) -> Self {
        self.shift(-1)
    }

    /// The last month (December) of this month's calendar year.
    #[must_use]
    pub const fn year_end(&self) -> Self {
        Self { year: self.year, month: 12 }
    }

    /// Year of the holding period this month belongs to.
    ///
    /// With a six month offset, July of year `t` through June of year `t + 1`
    /// all map to `t`.
    #[must_use]
    pub const fn fiscal_year(&self, offset_months: i32) -> i32 {
        self.shift(offset_months.saturating_neg()).year
    }

    /// Last calendar day of this month.
    #[must_use]
    pub fn last_day(&self) -> Option<Date> {
        Date::from_ymd_opt(self.year, self.month, 1)?
            .checked_add_months(Months::new(1))?
            .checked_sub_days(Days::new(1))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) =
            s.trim().split_once('-').ok_or_else(|| format!("expected YYYY-MM, got {s:?}"))?;
        let year = year.parse().map_err(|_| format!("invalid year in {s:?}"))?;
        let month = month.parse().map_err(|_| format!("invalid month in {s:?}"))?;
        Self::new(year, month).ok_or_else(|| format!("month out of range in {s:?}"))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<YearMonth> for String {
    fn from(month: YearMonth) -> Self {
        month.to_string()
    }
}

impl From<Date> for YearMonth {
    fn from(date: Date) -> Self {
        Self::from_date(date)
    }
}

/// Last calendar day of the month containing `date`.
#[must_use]
pub fn month_end(date: Date) -> Option<Date> {
    YearMonth::from_date(date).last_day()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[rstest]
    #[case(ym(2019, 6), -6, ym(2018, 12))]
    #[case(ym(2018, 12), 6, ym(2019, 6))]
    #[case(ym(2020, 1), -1, ym(2019, 12))]
    #[case(ym(2020, 3), 0, ym(2020, 3))]
    #[case(ym(1963, 7), 24, ym(1965, 7))]
    fn shift_crosses_year_boundaries(
        #[case] start: YearMonth,
        #[case] months: i32,
        #[case] expected: YearMonth,
    ) {
        assert_eq!(start.shift(months), expected);
    }

    #[test]
    fn extreme_shifts_do_not_overflow() {
        assert_eq!(ym(2019, 6).checked_shift(i32::MAX), None);
        assert_eq!(ym(2019, 6).checked_shift(i32::MIN), None);
        assert_eq!(ym(2019, 6).checked_shift(6), Some(ym(2019, 12)));
        assert!(ym(2019, 6).shift(i32::MAX) > ym(2019, 6));
        assert!(ym(2019, 6).shift(i32::MIN) < ym(2019, 6));
        assert_eq!(ym(2019, 6).fiscal_year(i32::MIN), ym(2019, 6).shift(i32::MAX).year());
    }

    #[rstest]
    #[case(ym(2019, 7), 2019)]
    #[case(ym(2019, 12), 2019)]
    #[case(ym(2020, 6), 2019)]
    #[case(ym(2020, 1), 2019)]
    #[case(ym(2019, 6), 2018)]
    fn fiscal_year_runs_july_to_june(#[case] month: YearMonth, #[case] expected: i32) {
        assert_eq!(month.fiscal_year(6), expected);
    }

    #[test]
    fn month_bounds_are_checked() {
        assert!(YearMonth::new(2020, 0).is_none());
        assert!(YearMonth::new(2020, 13).is_none());
        assert!(YearMonth::new(2020, 12).is_some());
    }

    #[test]
    fn parses_yyyymm() {
        assert_eq!(YearMonth::from_yyyymm(196307), Some(ym(1963, 7)));
        assert_eq!(YearMonth::from_yyyymm(196313), None);
    }

    #[test]
    fn last_day_handles_leap_years() {
        assert_eq!(ym(2020, 2).last_day(), Date::from_ymd_opt(2020, 2, 29));
        assert_eq!(ym(2019, 2).last_day(), Date::from_ymd_opt(2019, 2, 28));
        assert_eq!(ym(2019, 12).last_day(), Date::from_ymd_opt(2019, 12, 31));
    }

    #[test]
    fn month_end_of_mid_month_date() {
        let date = Date::from_ymd_opt(2018, 9, 14).unwrap();
        assert_eq!(month_end(date), Date::from_ymd_opt(2018, 9, 30));
    }

    #[rstest]
    #[case("1963-07", Some(ym(1963, 7)))]
    #[case(" 2020-12 ", Some(ym(2020, 12)))]
    #[case("2020-13", None)]
    #[case("202012", None)]
    fn parses_display_form(#[case] input: &str, #[case] expected: Option<YearMonth>) {
        assert_eq!(input.parse::<YearMonth>().ok(), expected);
    }

    #[test]
    fn clamped_keeps_month_in_range() {
        assert_eq!(YearMonth::clamped(2020, 0), ym(2020, 1));
        assert_eq!(YearMonth::clamped(2020, 7), ym(2020, 7));
        assert_eq!(YearMonth::clamped(2020, 14), ym(2020, 12));
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(ym(2018, 12) < ym(2019, 1));
        assert!(ym(2019, 1) < ym(2019, 2));
        assert_eq!(ym(2019, 3).to_string(), "2019-03");
    }
}
