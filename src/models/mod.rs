//! Forecasting models and their prediction outputs

use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// One model output unit: a timestamp with a point estimate and its
/// uncertainty interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    /// Predicted timestamp (canonical time of day)
    pub timestamp: DateTime<Utc>,
    /// Point estimate
    pub point_estimate: f64,
    /// Lower uncertainty bound
    pub lower_bound: f64,
    /// Upper uncertainty bound
    pub upper_bound: f64,
}

impl PredictionRow {
    /// Create a row, enforcing `lower_bound <= point_estimate <= upper_bound`.
    pub fn new(
        timestamp: DateTime<Utc>,
        point_estimate: f64,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<Self> {
        if !(lower_bound <= point_estimate && point_estimate <= upper_bound) {
            return Err(ForecastError::ValidationError(format!(
                "Bounds must satisfy lower <= point <= upper, got {lower_bound} / {point_estimate} / {upper_bound}"
            )));
        }

        Ok(Self {
            timestamp,
            point_estimate,
            lower_bound,
            upper_bound,
        })
    }
}

/// Ordered result of a prediction query.
///
/// Zero rows means the requested date(s) fell outside the computable window.
/// That is a valid, reportable outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    rows: Vec<PredictionRow>,
}

impl PredictionResult {
    /// Wrap rows, preserving their order
    pub fn new(rows: Vec<PredictionRow>) -> Self {
        Self { rows }
    }

    /// The valid "no data" outcome
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Get the rows in ascending timestamp order
    pub fn rows(&self) -> &[PredictionRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row matched the request
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row of a single-date query, if one matched
    pub fn single(&self) -> Option<&PredictionRow> {
        match self.rows.as_slice() {
            [row] => Some(row),
            _ => None,
        }
    }

    /// Serialize to downloadable CSV with an RFC 3339 timestamp column.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["timestamp", "predicted", "lower_bound", "upper_bound"])?;

        for row in &self.rows {
            writer.write_record([
                row.timestamp.to_rfc3339(),
                row.point_estimate.to_string(),
                row.lower_bound.to_string(),
                row.upper_bound.to_string(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ForecastError::CsvError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ForecastError::CsvError(e.to_string()))
    }
}

impl<'a> IntoIterator for &'a PredictionResult {
    type Item = &'a PredictionRow;
    type IntoIter = std::slice::Iter<'a, PredictionRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Trained forecast model: immutable once produced, shared read-only.
pub trait TrainedForecastModel: Debug {
    /// Last timestamp present in the training history
    fn last_history_timestamp(&self) -> DateTime<Utc>;

    /// Produce one prediction row per requested future timestamp, in the
    /// order given. Pure: identical input always yields identical rows.
    fn predict(&self, timestamps: &[DateTime<Utc>]) -> Result<Vec<PredictionRow>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a historical series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a historical series
    fn train(&self, data: &HistoricalSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod drift;
pub mod trend_seasonal;
