//! Plain-text rendering of core results.

use chrono::Month;
use fx_core::{CurrencyCode, MonthlyAverage, RateSnapshot, RateTable, SymbolTable};

fn format_rate(rate: f64) -> String {
    format!("{rate:.6}")
}

/// Aligned grid: first column left-aligned, the rest right-aligned.
fn grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &w))| {
                if i == 0 {
                    format!("{cell:<w$}")
                } else {
                    format!("{cell:>w$}")
                }
            })
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = format!("{}\n{}\n", line(headers), rule.join("  "));
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

pub fn table(table: &RateTable) -> String {
    if table.is_empty() {
        return "(no data)\n".to_string();
    }

    let headers: Vec<String> = std::iter::once(table.row_header.clone())
        .chain(table.columns.iter().cloned())
        .collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .cells
                .iter()
                .map(|c| c.map_or_else(|| "-".to_string(), format_rate));
            std::iter::once(row.label.clone()).chain(cells).collect()
        })
        .collect();

    grid(&headers, &rows)
}

pub fn symbols(symbols: &SymbolTable) -> String {
    let rows: Vec<Vec<String>> = symbols
        .rows()
        .into_iter()
        .map(|(code, name)| vec![code, name])
        .collect();

    grid(&["Symbol".to_string(), "Long Name".to_string()], &rows)
}

pub fn latest(snapshot: &RateSnapshot) -> String {
    let mut out = match snapshot.timestamp {
        Some(ts) => format!(
            "Rates last updated at {}\n",
            ts.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => format!("Rates for {}\n", snapshot.date),
    };
    for (code, rate) in &snapshot.rates {
        let rate = format_rate(*rate);
        out.push_str(&format!("{} -> {code}: {rate}\n", snapshot.base));
    }

    out
}

pub fn best_months(
    base: &CurrencyCode,
    target: &CurrencyCode,
    months: &[MonthlyAverage],
) -> String {
    let mut out = format!("Best months to trade {base} -> {target} (highest average rate first)\n");
    if months.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let rows: Vec<Vec<String>> = months
        .iter()
        .map(|m| {
            vec![
                m.month.to_string(),
                format_rate(m.average),
                m.samples.to_string(),
            ]
        })
        .collect();
    let headers = ["Month".to_string(), "Average".to_string(), "Days".to_string()];
    out.push_str(&grid(&headers, &rows));
    out
}

pub fn seasonality(base: &CurrencyCode, target: &CurrencyCode, months: &[(Month, f64)]) -> String {
    let mut out = format!("Average {base} -> {target} rate by month of year\n");
    if months.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let rows: Vec<Vec<String>> = months
        .iter()
        .map(|(m, avg)| vec![m.name().to_string(), format_rate(*avg)])
        .collect();
    out.push_str(&grid(&["Month".to_string(), "Average".to_string()], &rows));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use fx_core::{RateTimeseries, YearMonth};
    use std::collections::BTreeMap;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::try_from(s).unwrap()
    }

    #[test]
    fn grid_aligns_columns() {
        let out = grid(
            &["Date".to_string(), "USD".to_string()],
            &[vec!["2023-01-01".to_string(), "1.5".to_string()]],
        );
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Date        USD");
        assert_eq!(lines[1], "----------  ---");
        assert_eq!(lines[2], "2023-01-01  1.5");
    }

    #[test]
    fn timeseries_table_shows_gaps_as_dash() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let ts = RateTimeseries {
            base: code("GBP"),
            start_date: d("2023-01-01"),
            end_date: d("2023-01-02"),
            rates: BTreeMap::from([
                (d("2023-01-01"), BTreeMap::from([(code("USD"), 1.2), (code("EUR"), 1.1)])),
                (d("2023-01-02"), BTreeMap::from([(code("USD"), 1.25)])),
            ]),
        };

        let out = table(&ts.to_table(&[]));

        assert!(out.starts_with("Date"));
        assert!(out.contains("1.100000"));
        let last = out.lines().last().unwrap();
        assert!(last.starts_with("2023-01-02"));
        assert!(last.contains(" - "));
        assert!(last.ends_with("1.250000"));
    }

    #[test]
    fn latest_prints_timestamp_and_pairs() {
        let snapshot = RateSnapshot {
            base: code("GBP"),
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            timestamp: Some(Utc.with_ymd_and_hms(2023, 1, 1, 12, 30, 0).unwrap()),
            rates: BTreeMap::from([(code("USD"), 1.21)]),
        };

        let out = latest(&snapshot);
        assert!(out.contains("Rates last updated at 2023-01-01 12:30:00 UTC"));
        assert!(out.contains("GBP -> USD: 1.210000"));
    }

    #[test]
    fn best_months_lists_in_given_order() {
        let month = |month, average, samples| MonthlyAverage {
            month: YearMonth { year: 2023, month },
            average,
            samples,
        };
        let months = [month(2, 1.1, 1), month(1, 1.06, 2)];

        let out = best_months(&code("EUR"), &code("USD"), &months);
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].contains("EUR -> USD"));
        assert!(lines[3].starts_with("2023-02"));
        assert!(lines[4].starts_with("2023-01"));
    }

    #[test]
    fn empty_results_say_so() {
        let empty = RateTable {
            row_header: "Date".into(),
            columns: vec![],
            rows: vec![],
        };

        assert_eq!(table(&empty), "(no data)\n");
        assert!(seasonality(&code("EUR"), &code("USD"), &[]).contains("(no data)"));
    }

    #[test]
    fn symbols_render_code_and_name() {
        let table = SymbolTable {
            symbols: BTreeMap::from([(code("GBP"), "British Pound Sterling".to_string())]),
        };

        let out = symbols(&table);
        assert!(out.lines().next().unwrap().starts_with("Symbol"));
        assert!(out.contains("GBP     British Pound Sterling"));
    }
}
