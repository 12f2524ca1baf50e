use anyhow::{Context, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use fx_core::{
    Config, CurrencyCode, DEFAULT_CONFIG_PATH, DateRange, FxError, Period, RatesProvider,
    best_months, config::DEFAULT_BASE_URL, fetch_timeseries_chunked, monthly_seasonality,
    provider_from_config,
};
use std::path::{Path, PathBuf};

use crate::{prompt, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "fx", version, about = "Currency exchange rates CLI")]
pub struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log requests and responses (same as RUST_LOG=debug).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key (and optionally the API base URL).
    Configure,

    /// List every supported currency and its long name.
    Symbols,

    /// Show the latest rates from a base currency.
    Latest {
        /// Base currency, e.g. GBP. Asked interactively when absent.
        #[arg(long)]
        base: Option<CurrencyCode>,

        /// Comma-separated target currencies, e.g. USD,EUR.
        #[arg(long, value_delimiter = ',')]
        symbols: Vec<CurrencyCode>,
    },

    /// Show a timeseries and the best months to trade.
    Timeseries {
        /// Base currency, e.g. GBP. Asked interactively when absent.
        #[arg(long)]
        base: Option<CurrencyCode>,

        /// Comma-separated target currencies, e.g. USD,EUR.
        #[arg(long, value_delimiter = ',')]
        symbols: Vec<CurrencyCode>,

        /// Look-back window ending today (1w, 1m, 3m, 6m, 1y, 2y, 5y).
        /// Takes precedence over --start/--end.
        #[arg(long)]
        period: Option<Period>,

        /// First day of the timeseries (YYYY-MM-DD).
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of the timeseries (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        end: Option<NaiveDate>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(&self.config),
            Command::Symbols => {
                let provider = load_provider(&self.config)?;
                let table = provider
                    .symbols()
                    .await
                    .context("Failed to retrieve all available symbols")?;
                print!("{}", render::symbols(&table));
                Ok(())
            }
            Command::Latest { base, symbols } => {
                let provider = load_provider(&self.config)?;
                let (base, targets) = select_currencies(provider.as_ref(), base, symbols).await?;

                let snapshot = provider
                    .latest(&base, &targets)
                    .await
                    .context("Failed to retrieve latest exchange rates")?;
                print!("{}", render::latest(&snapshot));
                Ok(())
            }
            Command::Timeseries {
                base,
                symbols,
                period,
                start,
                end,
            } => {
                let provider = load_provider(&self.config)?;
                let (base, targets) = select_currencies(provider.as_ref(), base, symbols).await?;

                let period = match (period, start) {
                    (None, None) => Some(prompt::period()?),
                    (period, _) => period,
                };
                let today = Local::now().date_naive();
                let range = resolve_range(period, start, end, today)?;

                let ts = fetch_timeseries_chunked(provider.as_ref(), &base, &targets, range)
                    .await
                    .context("Failed to retrieve timeseries of exchange rates")?;

                println!("{base} exchange rates, {range}");
                print!("{}", render::table(&ts.to_table(&targets)));
                for target in &targets {
                    let months = best_months(&ts, target);
                    let seasons = monthly_seasonality(&ts, target);

                    println!();
                    print!("{}", render::best_months(&base, target, &months));
                    println!();
                    print!("{}", render::seasonality(&base, target, &seasons));
                }
                Ok(())
            }
        }
    }
}

fn configure(path: &Path) -> anyhow::Result<()> {
    let current_url = match Config::load(path) {
        Ok(cfg) => cfg.base_url,
        Err(_) => DEFAULT_BASE_URL.to_string(),
    };

    let api_key = prompt::api_key()?;
    if api_key.is_empty() {
        bail!("API key must not be empty.");
    }
    let base_url = prompt::base_url(&current_url)?;

    Config::new(api_key).with_base_url(base_url).save(path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn load_provider(path: &Path) -> anyhow::Result<Box<dyn RatesProvider>> {
    tracing::debug!(path = %path.display(), "loading configuration");
    let cfg = Config::load(path)?;
    Ok(provider_from_config(&cfg)?)
}

/// Fill in whatever the user did not pass on the command line from the
/// symbol table, which costs one extra request.
async fn select_currencies(
    provider: &dyn RatesProvider,
    base: Option<CurrencyCode>,
    targets: Vec<CurrencyCode>,
) -> anyhow::Result<(CurrencyCode, Vec<CurrencyCode>)> {
    if let Some(base) = &base
        && !targets.is_empty()
    {
        return Ok((base.clone(), targets));
    }

    let table = provider
        .symbols()
        .await
        .context("Failed to retrieve all available symbols")?;

    let base = match base {
        Some(base) => base,
        None => prompt::base_currency(&table)?,
    };
    let targets = if targets.is_empty() {
        prompt::target_currencies(&table)?
    } else {
        targets
    };

    if targets.is_empty() {
        return Err(FxError::NoTargets)
            .context("No target currency symbols have been selected. Please select at least one.");
    }

    Ok((base, targets))
}

/// `period` wins over explicit dates; a missing end date means `today`.
fn resolve_range(
    period: Option<Period>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> anyhow::Result<DateRange> {
    let end = end.unwrap_or(today);

    match (period, start) {
        (Some(period), _) => Ok(period.range_ending(end)),
        (None, Some(start)) => Ok(DateRange::new(start, end)?),
        (None, None) => bail!("Select either a time period (--period) or a start date (--start)."),
    }
}
