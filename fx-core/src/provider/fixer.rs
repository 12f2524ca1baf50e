use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{
    Config,
    error::{FxError, Result},
    model::{CurrencyCode, RateSnapshot, RateTimeseries, SymbolTable, validate_rate},
    period::DateRange,
};

use super::{RatesProvider, require_targets};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Symbols,
    Latest,
    Timeseries,
}

impl Endpoint {
    fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Symbols => "symbols",
            Endpoint::Latest => "latest",
            Endpoint::Timeseries => "timeseries",
        }
    }
}

/// Fixer exchange rates API, as served through the apilayer gateway.
/// The key travels in the `apikey` header.
#[derive(Debug, Clone)]
pub struct FixerClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl FixerClient {
    /// Builds an HTTP client with the configured request timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(config, http))
    }

    pub fn with_client(config: &Config, http: Client) -> Self {
        Self {
            api_key: config.api_key.trim().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.as_str())
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(endpoint);
        tracing::debug!(endpoint = endpoint.as_str(), %url, ?query, "sending request");

        let res = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(
            endpoint = endpoint.as_str(),
            status = status.as_u16(),
            bytes = body.len(),
            "response received"
        );

        decode(endpoint, status, &body)
    }
}

#[async_trait]
impl RatesProvider for FixerClient {
    async fn symbols(&self) -> Result<SymbolTable> {
        let wire: FxSymbolsResponse = self.get(Endpoint::Symbols, &[]).await?;

        let symbols: BTreeMap<CurrencyCode, String> = wire
            .symbols
            .into_iter()
            .map(|(code, name)| {
                CurrencyCode::try_from(code)
                    .map(|code| (code, name))
                    .map_err(|err| FxError::MalformedResponse(err.to_string()))
            })
            .collect::<Result<_>>()?;

        Ok(SymbolTable { symbols })
    }

    async fn latest(&self, base: &CurrencyCode, targets: &[CurrencyCode]) -> Result<RateSnapshot> {
        require_targets(targets)?;

        let query = [("base", base.to_string()), ("symbols", join_codes(targets))];
        let wire: FxLatestResponse = self.get(Endpoint::Latest, &query).await?;

        check_base(base, &wire.base)?;
        let rates = checked_rates(wire.rates, base, targets)?;

        Ok(RateSnapshot {
            base: base.clone(),
            date: wire.date,
            timestamp: wire.timestamp.and_then(|ts| DateTime::from_timestamp(ts, 0)),
            rates,
        })
    }

    async fn timeseries(
        &self,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
        range: DateRange,
    ) -> Result<RateTimeseries> {
        require_targets(targets)?;

        let query = [
            ("base", base.to_string()),
            ("symbols", join_codes(targets)),
            ("start_date", range.start().format("%Y-%m-%d").to_string()),
            ("end_date", range.end().format("%Y-%m-%d").to_string()),
        ];
        let wire: FxTimeseriesResponse = self.get(Endpoint::Timeseries, &query).await?;

        check_base(base, &wire.base)?;

        let mut rates = BTreeMap::new();
        for (date, day) in wire.rates {
            if !range.contains(date) {
                return Err(FxError::MalformedResponse(format!(
                    "timeseries contains {date}, outside requested range {range}"
                )));
            }
            rates.insert(date, checked_rates(day, base, targets)?);
        }

        if let Some(missing) = range.days().find(|day| !rates.contains_key(day)) {
            return Err(FxError::MalformedResponse(format!(
                "timeseries has no rates for {missing}, inside requested range {range}"
            )));
        }

        Ok(RateTimeseries {
            base: base.clone(),
            start_date: range.start(),
            end_date: range.end(),
            rates,
        })
    }
}

#[derive(Debug, Deserialize)]
struct FxEnvelope {
    success: Option<bool>,
    error: Option<FxErrorBody>,
}

#[derive(Debug, Deserialize)]
struct FxErrorBody {
    code: Option<i64>,
    #[serde(rename = "type")]
    kind: Option<String>,
    info: Option<String>,
}

impl FxErrorBody {
    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(code) = self.code {
            parts.push(format!("[{code}]"));
        }
        if let Some(kind) = &self.kind {
            parts.push(kind.clone());
        }
        if let Some(info) = &self.info {
            parts.push(info.clone());
        }

        if parts.is_empty() {
            "unknown error".to_string()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Deserialize)]
struct FxSymbolsResponse {
    symbols: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct FxLatestResponse {
    timestamp: Option<i64>,
    base: String,
    date: NaiveDate,
    rates: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct FxTimeseriesResponse {
    base: String,
    rates: BTreeMap<NaiveDate, BTreeMap<String, f64>>,
}

fn decode<T: DeserializeOwned>(endpoint: Endpoint, status: StatusCode, body: &str) -> Result<T> {
    let name = endpoint.as_str();

    if !status.is_success() {
        return Err(FxError::ApiError {
            status: status.as_u16(),
            message: error_message(body).unwrap_or_else(|| truncate_body(body)),
        });
    }

    let value: Value = serde_json::from_str(body).map_err(|err| {
        FxError::MalformedResponse(format!("{name} response is not valid JSON: {err}"))
    })?;

    let envelope = FxEnvelope::deserialize(&value).map_err(|err| {
        FxError::MalformedResponse(format!("{name} response envelope: {err}"))
    })?;
    if envelope.success == Some(false) {
        return Err(FxError::ApiError {
            status: status.as_u16(),
            message: envelope
                .error
                .map(|e| e.describe())
                .unwrap_or_else(|| "request was not successful".to_string()),
        });
    }

    serde_json::from_value(value)
        .map_err(|err| FxError::MalformedResponse(format!("{name} response: {err}")))
}

/// Pulls a readable message out of an error body, whichever of the two
/// shapes (Fixer envelope or gateway `{"message": ..}`) it has.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    if let Some(error) = value.get("error")
        && let Ok(parsed) = FxErrorBody::deserialize(error)
    {
        return Some(parsed.describe());
    }

    value.get("message").and_then(Value::as_str).map(str::to_string)
}

fn check_base(requested: &CurrencyCode, answered: &str) -> Result<()> {
    if requested.as_str() == answered {
        Ok(())
    } else {
        Err(FxError::MalformedResponse(format!(
            "expected base {requested}, response has base {answered}"
        )))
    }
}

/// Validates one set of rates against the request: only requested codes,
/// and every requested code except the base itself.
fn checked_rates(
    raw: BTreeMap<String, f64>,
    base: &CurrencyCode,
    targets: &[CurrencyCode],
) -> Result<BTreeMap<CurrencyCode, f64>> {
    let rates = raw
        .into_iter()
        .map(|(code, rate)| {
            let (code, rate) = validate_rate(&code, rate)?;
            if !targets.contains(&code) {
                return Err(FxError::MalformedResponse(format!(
                    "unrequested currency {code} in response"
                )));
            }
            Ok((code, rate))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    for target in targets {
        if target != base && !rates.contains_key(target) {
            return Err(FxError::MalformedResponse(format!(
                "response has no rate for requested currency {target}"
            )));
        }
    }

    Ok(rates)
}

fn join_codes(codes: &[CurrencyCode]) -> String {
    codes
        .iter()
        .map(CurrencyCode::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
