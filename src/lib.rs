//! # Price Forecast
//!
//! A Rust library for answering date and date-range price prediction queries
//! against daily time-series forecasting models.
//!
//! ## Features
//!
//! - Historical series handling with CSV ingestion and remote fetch
//! - Forecasting models (trend + weekly seasonality, random walk with drift)
//! - Persisted model artifacts, loaded once and shared read-only
//! - A query service turning calendar dates into exact-match or inclusive
//!   range predictions with confidence bounds
//!
//! ## Quick Start
//!
//! ```
//! use chrono::{Duration, NaiveDate};
//! use price_forecast::data::HistoricalSeries;
//! use price_forecast::models::trend_seasonal::TrendSeasonal;
//! use price_forecast::models::ForecastModel;
//! use price_forecast::query::ForecastQueryService;
//! use price_forecast::utils::canonical_timestamp;
//!
//! # fn main() -> price_forecast::error::Result<()> {
//! // Sixty days of history ending 2024-11-30
//! let start = NaiveDate::from_ymd_opt(2024, 10, 2).unwrap();
//! let timestamps: Vec<_> = (0..60)
//!     .map(|i| canonical_timestamp(start + Duration::days(i)))
//!     .collect();
//! let values: Vec<f64> = (0..60).map(|i| 100.0 + 0.5 * i as f64).collect();
//! let series = HistoricalSeries::from_parts(timestamps, values)?;
//!
//! // Fit once, query many times
//! let trained = TrendSeasonal::new(0.95)?.train(&series)?;
//! let service = ForecastQueryService::new(trained);
//!
//! let result = service.predict_single(NaiveDate::from_ymd_opt(2024, 12, 12).unwrap())?;
//! assert_eq!(result.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod data;
pub mod error;
pub mod models;
pub mod provider;
pub mod query;
pub mod utils;

// Re-export commonly used types
pub use crate::artifact::ModelArtifact;
pub use crate::data::{DataLoader, HistoricalSeries, SeriesPoint};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{
    ForecastModel, PredictionResult, PredictionRow, TrainedForecastModel,
};
pub use crate::provider::MarketDataProvider;
pub use crate::query::ForecastQueryService;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
