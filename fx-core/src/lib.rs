//! Core library for the `fx` currency exchange rates CLI.
//!
//! This crate defines:
//! - Configuration loading (API key, base URL, timeout)
//! - The exchange rates client and the provider abstraction behind it
//! - Shared domain models (snapshots, timeseries, symbol tables)
//! - Tabular reshaping and the "best months to trade" analysis
//!
//! It is used by `fx-cli`, but holds no presentation code: every operation
//! returns plain data for the caller to render.

pub mod analysis;
pub mod config;
pub mod error;
pub mod model;
pub mod period;
pub mod provider;
pub mod table;

pub use analysis::{MonthlyAverage, YearMonth, best_months, monthly_seasonality};
pub use config::{Config, DEFAULT_CONFIG_PATH, load_configuration};
pub use error::{FxError, Result};
pub use model::{CurrencyCode, RateSnapshot, RateTimeseries, SymbolTable};
pub use period::{DateRange, MAX_TIMESERIES_DAYS, Period};
pub use provider::{
    FixerClient, RatesProvider, fetch_latest, fetch_symbols, fetch_timeseries,
    fetch_timeseries_chunked, provider_from_config,
};
pub use table::{RateTable, TableRow};
