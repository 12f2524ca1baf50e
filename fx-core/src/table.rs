//! Reshapes API payloads into rectangular tables for display.

use crate::model::{CurrencyCode, RateSnapshot, RateTimeseries, SymbolTable};

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub label: String,
    pub cells: Vec<Option<f64>>,
}

/// Rows labelled by date or currency, one numeric column per rate.
/// A cell is `None` when the provider returned no rate for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub row_header: String,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl RateTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row.cells[idx]).collect())
    }
}

impl SymbolTable {
    /// `(code, display name)` rows in code order.
    pub fn rows(&self) -> Vec<(String, String)> {
        self.symbols
            .iter()
            .map(|(code, name)| (code.to_string(), name.clone()))
            .collect()
    }
}

impl RateSnapshot {
    /// One row per target currency.
    pub fn to_table(&self) -> RateTable {
        RateTable {
            row_header: "Currency".to_string(),
            columns: vec![format!("{} rate", self.base)],
            rows: self
                .rates
                .iter()
                .map(|(code, rate)| TableRow {
                    label: code.to_string(),
                    cells: vec![Some(*rate)],
                })
                .collect(),
        }
    }
}

impl RateTimeseries {
    /// One row per date, one column per target. An empty `targets` slice
    /// means every target present in the data.
    pub fn to_table(&self, targets: &[CurrencyCode]) -> RateTable {
        let targets = if targets.is_empty() {
            self.targets()
        } else {
            targets.to_vec()
        };

        let rows = self
            .rates
            .iter()
            .map(|(date, day)| TableRow {
                label: date.format("%Y-%m-%d").to_string(),
                cells: targets.iter().map(|t| day.get(t).copied()).collect(),
            })
            .collect();

        RateTable {
            row_header: "Date".to_string(),
            columns: targets.iter().map(ToString::to_string).collect(),
            rows,
        }
    }
}
