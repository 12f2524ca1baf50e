use chrono::{Days, Months, NaiveDate};
use std::{fmt, str::FromStr};

use crate::error::FxError;

/// Longest span, in days, the timeseries endpoint serves in one request.
pub const MAX_TIMESERIES_DAYS: u64 = 365;

/// Inclusive date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, FxError> {
        if start > end {
            return Err(FxError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn len_days(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Split into consecutive windows of at most `max_days` days each.
    /// Windows do not overlap and together cover the range exactly.
    pub fn windows(&self, max_days: u64) -> Vec<DateRange> {
        let max_days = max_days.max(1);
        let mut out = Vec::new();
        let mut start = self.start;

        loop {
            let end = start
                .checked_add_days(Days::new(max_days - 1))
                .map_or(self.end, |end| end.min(self.end));
            out.push(DateRange { start, end });

            match end.succ_opt() {
                Some(next) if end < self.end => start = next,
                _ => break,
            }
        }

        out
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Named look-back windows offered instead of explicit dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Week,
    Month,
    Quarter,
    HalfYear,
    Year,
    TwoYears,
    FiveYears,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "1w",
            Period::Month => "1m",
            Period::Quarter => "3m",
            Period::HalfYear => "6m",
            Period::Year => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Week => "1 week",
            Period::Month => "1 month",
            Period::Quarter => "3 months",
            Period::HalfYear => "6 months",
            Period::Year => "1 year",
            Period::TwoYears => "2 years",
            Period::FiveYears => "5 years",
        }
    }

    pub const fn all() -> &'static [Period] {
        &[
            Period::Week,
            Period::Month,
            Period::Quarter,
            Period::HalfYear,
            Period::Year,
            Period::TwoYears,
            Period::FiveYears,
        ]
    }

    /// The range that ends on `end` and reaches back one period.
    pub fn range_ending(&self, end: NaiveDate) -> DateRange {
        let start = match self {
            Period::Week => end.checked_sub_days(Days::new(7)),
            Period::Month => end.checked_sub_months(Months::new(1)),
            Period::Quarter => end.checked_sub_months(Months::new(3)),
            Period::HalfYear => end.checked_sub_months(Months::new(6)),
            Period::Year => end.checked_sub_months(Months::new(12)),
            Period::TwoYears => end.checked_sub_months(Months::new(24)),
            Period::FiveYears => end.checked_sub_months(Months::new(60)),
        }
        .unwrap_or(NaiveDate::MIN);

        DateRange { start, end }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();

        Period::all()
            .iter()
            .find(|p| p.as_str() == lower || p.label() == lower)
            .copied()
            .ok_or_else(|| {
                let supported: Vec<&str> = Period::all().iter().map(Period::as_str).collect();
                format!(
                    "Unknown period '{s}'. Supported periods: {}.",
                    supported.join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn new_rejects_reversed_range() {
        let err = DateRange::new(d("2023-02-01"), d("2023-01-01")).unwrap_err();
        assert!(matches!(err, FxError::InvalidDateRange { .. }));
    }

    #[test]
    fn single_day_range_is_valid() {
        let range = DateRange::new(d("2023-01-01"), d("2023-01-01")).unwrap();
        assert_eq!(range.len_days(), 1);
        assert_eq!(range.days().collect::<Vec<_>>(), vec![d("2023-01-01")]);
    }

    #[test]
    fn days_are_inclusive() {
        let range = DateRange::new(d("2023-02-27"), d("2023-03-02")).unwrap();
        let days: Vec<_> = range.days().collect();

        assert_eq!(
            days,
            vec![
                d("2023-02-27"),
                d("2023-02-28"),
                d("2023-03-01"),
                d("2023-03-02"),
            ]
        );
        assert_eq!(range.len_days(), 4);
    }

    #[test]
    fn windows_cover_range_without_overlap() {
        let range = DateRange::new(d("2020-01-01"), d("2022-06-30")).unwrap();
        let windows = range.windows(MAX_TIMESERIES_DAYS);

        assert_eq!(windows.first().unwrap().start(), range.start());
        assert_eq!(windows.last().unwrap().end(), range.end());
        for w in &windows {
            assert!(w.len_days() <= MAX_TIMESERIES_DAYS);
        }
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end().succ_opt().unwrap(), pair[1].start());
        }
        let total: u64 = windows.iter().map(DateRange::len_days).sum();
        assert_eq!(total, range.len_days());
    }

    #[test]
    fn short_range_is_one_window() {
        let range = DateRange::new(d("2023-01-01"), d("2023-12-31")).unwrap();
        assert_eq!(range.windows(MAX_TIMESERIES_DAYS), vec![range]);
    }

    #[test]
    fn period_ranges_end_on_given_date() {
        let end = d("2024-03-31");

        assert_eq!(Period::Week.range_ending(end).start(), d("2024-03-24"));
        assert_eq!(Period::Month.range_ending(end).start(), d("2024-02-29"));
        assert_eq!(Period::Year.range_ending(end).start(), d("2023-03-31"));
        assert_eq!(Period::FiveYears.range_ending(end).end(), end);
    }

    #[test]
    fn period_parses_short_and_long_names() {
        for p in Period::all() {
            assert_eq!(p.as_str().parse::<Period>().unwrap(), *p);
            assert_eq!(p.label().parse::<Period>().unwrap(), *p);
        }
        let err = "fortnight".parse::<Period>().unwrap_err();
        assert!(err.contains("Unknown period"));
    }
}
