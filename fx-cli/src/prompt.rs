//! Interactive pickers, used when a command is run without the matching
//! arguments.

use anyhow::{Context, Result};
use fx_core::{CurrencyCode, Period, SymbolTable};
use inquire::{MultiSelect, Password, PasswordDisplayMode, Select, Text};
use std::fmt;

/// Preselected base currency in the pickers.
pub const DEFAULT_BASE: &str = "GBP";

#[derive(Debug, Clone)]
struct CurrencyOption {
    code: CurrencyCode,
    name: String,
}

impl fmt::Display for CurrencyOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.name)
    }
}

fn options(table: &SymbolTable) -> Vec<CurrencyOption> {
    table
        .symbols
        .iter()
        .map(|(code, name)| CurrencyOption {
            code: code.clone(),
            name: name.clone(),
        })
        .collect()
}

pub fn api_key() -> Result<String> {
    let key = Password::new("API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    Ok(key.trim().to_string())
}

pub fn base_url(default: &str) -> Result<String> {
    Text::new("API base URL:")
        .with_default(default)
        .prompt()
        .context("Failed to read API base URL")
}

pub fn base_currency(table: &SymbolTable) -> Result<CurrencyCode> {
    let options = options(table);
    let cursor = options
        .iter()
        .position(|o| o.code.as_str() == DEFAULT_BASE)
        .unwrap_or(0);

    let picked = Select::new("Base currency symbol:", options)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read base currency")?;

    Ok(picked.code)
}

pub fn target_currencies(table: &SymbolTable) -> Result<Vec<CurrencyCode>> {
    let options = options(table);
    let picked = MultiSelect::new("Currency symbols to limit output currencies:", options)
        .prompt()
        .context("Failed to read target currencies")?;

    Ok(picked.into_iter().map(|o| o.code).collect())
}

pub fn period() -> Result<Period> {
    let cursor = Period::all()
        .iter()
        .position(|p| *p == Period::Year)
        .unwrap_or(0);

    Select::new("Time period:", Period::all().to_vec())
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read time period")
}
