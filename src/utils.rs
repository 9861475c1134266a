//! Utility functions for the price_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use statrs::distribution::{ContinuousCDF, Normal};

/// Canonical time of day applied to calendar dates. The training history
/// stamps daily observations at 04:00:00 UTC, so queries must use the same
/// offset for exact timestamp matches to succeed.
pub const CANONICAL_HOUR: u32 = 4;

/// Convert a calendar date to its canonical UTC timestamp (04:00:00).
pub fn canonical_timestamp(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_hms_opt(CANONICAL_HOUR, 0, 0).unwrap();
    DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)
}

/// Create future timestamps for forecasting at daily frequency.
///
/// The sequence starts on the day after `last_timestamp` and contains
/// `horizon` canonical timestamps in ascending order.
pub fn future_timestamps(last_timestamp: DateTime<Utc>, horizon: usize) -> Vec<DateTime<Utc>> {
    let last_date = last_timestamp.date_naive();
    (1..=horizon as i64)
        .map(|offset| canonical_timestamp(last_date + Duration::days(offset)))
        .collect()
}

/// Standard normal quantile for a two-sided confidence level.
///
/// `z_score(0.95)` is about 1.96.
pub fn z_score(confidence_level: f64) -> Result<f64> {
    if confidence_level <= 0.0 || confidence_level >= 1.0 {
        return Err(ForecastError::ValidationError(
            "Confidence level must be between 0 and 1".to_string(),
        ));
    }

    let normal =
        Normal::new(0.0, 1.0).map_err(|e| ForecastError::MathError(e.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + confidence_level / 2.0))
}
