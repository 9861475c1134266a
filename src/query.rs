//! Forecast query service: single-date and date-range prediction requests

use crate::error::{ForecastError, Result};
use crate::models::{PredictionResult, TrainedForecastModel};
use crate::utils::{canonical_timestamp, future_timestamps};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;

/// Minimum number of periods requested from the model, so generation stays
/// well-formed even when the target sits at or before the known history.
const MIN_PERIODS: usize = 1;

/// Answers prediction queries against a shared, read-only trained model.
///
/// The model handle is injected at construction and never mutated by a query
/// path, so a service (or clones of it) can serve concurrent reads without
/// locking. Reloading means building a new trained model and constructing a
/// fresh service around it, never mutating the existing handle in place.
#[derive(Debug, Clone)]
pub struct ForecastQueryService<M: TrainedForecastModel> {
    model: Arc<M>,
}

impl<M: TrainedForecastModel> ForecastQueryService<M> {
    /// Create a service owning its model handle
    pub fn new(model: M) -> Self {
        Self {
            model: Arc::new(model),
        }
    }

    /// Create a service over an already shared model handle
    pub fn from_shared(model: Arc<M>) -> Self {
        Self { model }
    }

    /// The underlying trained model
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Number of periods the model must generate for the future window to
    /// reach `target`: one more than the day distance from the last known
    /// history date, and never less than one.
    pub fn compute_horizon(&self, target: DateTime<Utc>) -> usize {
        let last = self.model.last_history_timestamp();
        let days = (target.date_naive() - last.date_naive()).num_days();
        days.saturating_add(1).max(MIN_PERIODS as i64) as usize
    }

    /// Predict the value for a single calendar date.
    ///
    /// Returns the row whose timestamp exactly equals the canonical target
    /// timestamp, or an empty result when the date is outside the
    /// generatable future window (dates at or before the last training date
    /// are such a case).
    pub fn predict_single(&self, target_date: NaiveDate) -> Result<PredictionResult> {
        let target = canonical_timestamp(target_date);
        let horizon = self.compute_horizon(target);
        debug!(requested = %target, periods = horizon, "single-date query");

        let window = future_timestamps(self.model.last_history_timestamp(), horizon);
        let rows = self.model.predict(&window)?;

        let matched = rows.into_iter().find(|row| row.timestamp == target);
        Ok(PredictionResult::new(matched.into_iter().collect()))
    }

    /// Predict values for every day of an inclusive date range.
    ///
    /// Rows come back in ascending timestamp order. An inverted range is
    /// rejected before any model invocation; a range entirely outside the
    /// generatable window yields an empty result.
    pub fn predict_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PredictionResult> {
        if start_date > end_date {
            return Err(ForecastError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }

        let start = canonical_timestamp(start_date);
        let end = canonical_timestamp(end_date);
        let horizon = self.compute_horizon(end);
        debug!(from = %start, to = %end, periods = horizon, "range query");

        let window = future_timestamps(self.model.last_history_timestamp(), horizon);
        let rows = self.model.predict(&window)?;

        let matched = rows
            .into_iter()
            .filter(|row| row.timestamp >= start && row.timestamp <= end)
            .collect();
        Ok(PredictionResult::new(matched))
    }
}
