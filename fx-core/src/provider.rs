use async_trait::async_trait;
use chrono::NaiveDate;
use std::{collections::BTreeMap, fmt::Debug};

use crate::{
    Config,
    error::{FxError, Result},
    model::{CurrencyCode, RateSnapshot, RateTimeseries, SymbolTable},
    period::{DateRange, MAX_TIMESERIES_DAYS},
};

pub mod fixer;

pub use fixer::FixerClient;

/// Source of exchange rate data. Every call is one independent request.
#[async_trait]
pub trait RatesProvider: Send + Sync + Debug {
    async fn symbols(&self) -> Result<SymbolTable>;

    async fn latest(&self, base: &CurrencyCode, targets: &[CurrencyCode]) -> Result<RateSnapshot>;

    async fn timeseries(
        &self,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
        range: DateRange,
    ) -> Result<RateTimeseries>;
}

/// Construct the HTTP provider from config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn RatesProvider>> {
    Ok(Box::new(FixerClient::new(config)?))
}

pub async fn fetch_symbols(config: &Config) -> Result<SymbolTable> {
    FixerClient::new(config)?.symbols().await
}

pub async fn fetch_latest(
    config: &Config,
    base: &CurrencyCode,
    targets: &[CurrencyCode],
) -> Result<RateSnapshot> {
    FixerClient::new(config)?.latest(base, targets).await
}

/// Fails with `InvalidDateRange` before touching the network when
/// `start_date > end_date`.
pub async fn fetch_timeseries(
    config: &Config,
    base: &CurrencyCode,
    targets: &[CurrencyCode],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<RateTimeseries> {
    let range = DateRange::new(start_date, end_date)?;
    FixerClient::new(config)?.timeseries(base, targets, range).await
}

/// Fetch a timeseries of any length, one request per window of at most
/// [`MAX_TIMESERIES_DAYS`] days. Windows are fetched in order and the first
/// failure is returned as is.
pub async fn fetch_timeseries_chunked(
    provider: &dyn RatesProvider,
    base: &CurrencyCode,
    targets: &[CurrencyCode],
    range: DateRange,
) -> Result<RateTimeseries> {
    let windows = range.windows(MAX_TIMESERIES_DAYS);
    if windows.len() > 1 {
        tracing::info!(%range, requests = windows.len(), "range exceeds one request, splitting");
    }

    let mut rates = BTreeMap::new();
    for window in windows {
        let part = provider.timeseries(base, targets, window).await?;
        if part.base != *base {
            return Err(FxError::MalformedResponse(format!(
                "expected base {base}, provider answered with {}",
                part.base
            )));
        }
        rates.extend(part.rates);
    }

    Ok(RateTimeseries {
        base: base.clone(),
        start_date: range.start(),
        end_date: range.end(),
        rates,
    })
}

pub(crate) fn require_targets(targets: &[CurrencyCode]) -> Result<()> {
    if targets.is_empty() {
        Err(FxError::NoTargets)
    } else {
        Ok(())
    }
}
