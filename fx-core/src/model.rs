use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::error::FxError;

/// ISO 4217 style currency code: exactly three ASCII uppercase letters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = FxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.len() == 3 && value.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(value.to_string()))
        } else {
            Err(FxError::InvalidCurrencyCode(value.to_string()))
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = FxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

/// Parsing is lenient about case and surrounding whitespace, so `usd` works
/// on the command line.
impl FromStr for CurrencyCode {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.trim().to_ascii_uppercase().as_str())
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// Reference data: every supported currency and its display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    pub symbols: BTreeMap<CurrencyCode, String>,
}

impl SymbolTable {
    pub fn name(&self, code: &CurrencyCode) -> Option<&str> {
        self.symbols.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Rates for a single date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub base: CurrencyCode,
    pub date: NaiveDate,
    /// When the provider last refreshed the rates, if it said.
    pub timestamp: Option<DateTime<Utc>>,
    pub rates: BTreeMap<CurrencyCode, f64>,
}

/// Date-indexed rates over an inclusive range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTimeseries {
    pub base: CurrencyCode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rates: BTreeMap<NaiveDate, BTreeMap<CurrencyCode, f64>>,
}

impl RateTimeseries {
    /// `(date, rate)` points for one target, in date order. Days without a
    /// rate for `target` are left out.
    pub fn series(&self, target: &CurrencyCode) -> Vec<(NaiveDate, f64)> {
        self.rates
            .iter()
            .filter_map(|(date, day)| day.get(target).map(|rate| (*date, *rate)))
            .collect()
    }

    /// Every target that appears on at least one day.
    pub fn targets(&self) -> Vec<CurrencyCode> {
        let mut targets: Vec<CurrencyCode> = self
            .rates
            .values()
            .flat_map(|day| day.keys().cloned())
            .collect();
        targets.sort();
        targets.dedup();
        targets
    }
}

/// Checks a raw `(code, rate)` pair coming off the wire.
pub(crate) fn validate_rate(code: &str, rate: f64) -> Result<(CurrencyCode, f64), FxError> {
    let code = CurrencyCode::try_from(code)
        .map_err(|err| FxError::MalformedResponse(err.to_string()))?;

    if !rate.is_finite() || rate <= 0.0 {
        return Err(FxError::MalformedResponse(format!(
            "rate for {code} must be a positive finite number, got {rate}"
        )));
    }

    Ok((code, rate))
}
