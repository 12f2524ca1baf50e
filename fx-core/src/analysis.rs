//! "Best months to trade": grouped averages over a timeseries.

use chrono::{Datelike, Month};
use std::{collections::BTreeMap, fmt};

use crate::model::{CurrencyCode, RateTimeseries};

/// A calendar month, e.g. `2023-02`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyAverage {
    pub month: YearMonth,
    pub average: f64,
    pub samples: usize,
}

fn monthly_means(
    timeseries: &RateTimeseries,
    target: &CurrencyCode,
) -> BTreeMap<YearMonth, (f64, usize)> {
    let mut sums: BTreeMap<YearMonth, (f64, usize)> = BTreeMap::new();

    for (date, rate) in timeseries.series(target) {
        let key = YearMonth {
            year: date.year(),
            month: date.month(),
        };
        let entry = sums.entry(key).or_insert((0.0, 0));
        entry.0 += rate;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(k, (sum, n))| (k, (sum / n as f64, n)))
        .collect()
}

/// Average `base -> target` rate per calendar month, best month first.
/// Equal averages keep the earlier month first.
pub fn best_months(timeseries: &RateTimeseries, target: &CurrencyCode) -> Vec<MonthlyAverage> {
    let mut months: Vec<MonthlyAverage> = monthly_means(timeseries, target)
        .into_iter()
        .map(|(month, (average, samples))| MonthlyAverage {
            month,
            average,
            samples,
        })
        .collect();

    months.sort_by(|a, b| b.average.total_cmp(&a.average).then(a.month.cmp(&b.month)));
    months
}

/// Average rate per month of the year, January first.
///
/// Each calendar month is averaged on its own, then the monthly means are
/// averaged across years, so a year with more data points does not dominate.
pub fn monthly_seasonality(
    timeseries: &RateTimeseries,
    target: &CurrencyCode,
) -> Vec<(Month, f64)> {
    let mut by_month: BTreeMap<u32, (f64, usize)> = BTreeMap::new();

    for (ym, (mean, _)) in monthly_means(timeseries, target) {
        let entry = by_month.entry(ym.month).or_insert((0.0, 0));
        entry.0 += mean;
        entry.1 += 1;
    }

    by_month
        .into_iter()
        .filter_map(|(m, (sum, n))| {
            let month = Month::try_from(u8::try_from(m).ok()?).ok()?;
            Some((month, sum / n as f64))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::try_from(s).unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn timeseries(points: &[(&str, f64)]) -> RateTimeseries {
        let rates: BTreeMap<_, _> = points
            .iter()
            .map(|(date, rate)| (d(date), BTreeMap::from([(code("USD"), *rate)])))
            .collect();
        RateTimeseries {
            base: code("EUR"),
            start_date: *rates.keys().next().unwrap(),
            end_date: *rates.keys().last().unwrap(),
            rates,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn best_months_groups_and_sorts_descending() {
        let ts = timeseries(&[
            ("2023-01-15", 1.05),
            ("2023-02-10", 1.10),
            ("2023-01-20", 1.07),
        ]);

        let months = best_months(&ts, &code("USD"));

        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month.to_string(), "2023-02");
        assert!(close(months[0].average, 1.10));
        assert_eq!(months[1].month.to_string(), "2023-01");
        assert!(close(months[1].average, 1.06));
        assert_eq!(months[1].samples, 2);
    }

    #[test]
    fn best_months_breaks_ties_by_earliest_month() {
        let ts = timeseries(&[
            ("2023-03-01", 1.2),
            ("2022-11-05", 1.2),
            ("2023-01-01", 1.3),
        ]);

        let order: Vec<String> = best_months(&ts, &code("USD"))
            .iter()
            .map(|m| m.month.to_string())
            .collect();

        assert_eq!(order, vec!["2023-01", "2022-11", "2023-03"]);
    }

    #[test]
    fn best_months_separates_same_month_of_different_years() {
        let ts = timeseries(&[("2022-01-10", 1.0), ("2023-01-10", 2.0)]);

        let months = best_months(&ts, &code("USD"));
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month.to_string(), "2023-01");
    }

    #[test]
    fn best_months_is_empty_for_unknown_target() {
        let ts = timeseries(&[("2023-01-15", 1.05)]);
        assert!(best_months(&ts, &code("JPY")).is_empty());
    }

    #[test]
    fn seasonality_averages_monthly_means_across_years() {
        let ts = timeseries(&[
            ("2022-01-10", 1.0),
            ("2022-01-11", 1.0),
            ("2022-01-12", 1.0),
            ("2023-01-10", 2.0),
            ("2023-03-10", 1.5),
        ]);

        let seasons = monthly_seasonality(&ts, &code("USD"));

        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[0].0, Month::January);
        assert!(close(seasons[0].1, 1.5));
        assert_eq!(seasons[1].0, Month::March);
    }
}
