use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T, E = FxError> = std::result::Result<T, E>;

/// Every failure the core can report. Each one is scoped to a single
/// operation; nothing here is retried.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration in {}: {reason}", path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to write configuration file {}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Non-2xx HTTP response, or a 2xx body with `success: false`.
    #[error("Exchange rates API request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed exchange rates API response: {0}")]
    MalformedResponse(String),

    #[error("Invalid date range: start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid currency code '{0}': expected three uppercase letters, e.g. GBP")]
    InvalidCurrencyCode(String),

    #[error("At least one target currency must be selected")]
    NoTargets,

    #[error("Failed to reach the exchange rates API")]
    Transport(#[from] reqwest::Error),
}
