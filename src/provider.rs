//! Remote market data provider for daily price history

use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use crate::utils::canonical_timestamp;
use chrono::NaiveDate;
use tracing::info;

/// Default daily-history endpoint (stooq-style CSV download)
pub const DEFAULT_BASE_URL: &str = "https://stooq.com";

/// Client for a remote provider serving daily price history as CSV
/// (`Date,Open,High,Low,Close,Volume`).
///
/// Fetching history is one-time setup before a model is fit; every failure
/// here is `ModelUnavailable` so no prediction is attempted against data
/// that never arrived.
#[derive(Debug)]
pub struct MarketDataProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl MarketDataProvider {
    /// Create a provider against the default endpoint
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a provider against a custom endpoint
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the full daily close history for a symbol.
    pub fn daily_history(&self, symbol: &str) -> Result<HistoricalSeries> {
        let url = format!("{}/q/d/l/?s={}&i=d", self.base_url, symbol);

        let text = self
            .client
            .get(&url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| {
                ForecastError::ModelUnavailable(format!("Cannot fetch history for {symbol}: {e}"))
            })?;

        let series = Self::parse_daily_csv(&text)?;
        info!(symbol, observations = series.len(), "fetched daily history");
        Ok(series)
    }

    /// Parse a provider CSV payload into a historical series.
    ///
    /// Rows whose close value doesn't parse (holiday placeholders such as
    /// `N/D`) are skipped; a payload without the expected columns or without
    /// a single usable row is rejected.
    pub fn parse_daily_csv(text: &str) -> Result<HistoricalSeries> {
        let mut reader = csv::Reader::from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ForecastError::ModelUnavailable(format!("Unreadable provider CSV: {e}")))?;
        let date_index = Self::column_index(headers, "date")?;
        let close_index = Self::column_index(headers, "close")?;

        let mut timestamps = Vec::new();
        let mut values = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| {
                ForecastError::ModelUnavailable(format!("Unreadable provider CSV: {e}"))
            })?;

            let date = record
                .get(date_index)
                .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());
            let close = record.get(close_index).and_then(|raw| raw.parse::<f64>().ok());

            if let (Some(date), Some(close)) = (date, close) {
                timestamps.push(canonical_timestamp(date));
                values.push(close);
            }
        }

        if timestamps.is_empty() {
            return Err(ForecastError::ModelUnavailable(
                "Provider returned no usable history rows".to_string(),
            ));
        }

        HistoricalSeries::from_parts(timestamps, values)
            .map_err(|e| ForecastError::ModelUnavailable(format!("Provider history rejected: {e}")))
    }

    fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                ForecastError::ModelUnavailable(format!("Provider CSV has no '{name}' column"))
            })
    }
}

impl Default for MarketDataProvider {
    fn default() -> Self {
        Self::new()
    }
}
