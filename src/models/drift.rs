//! Random walk with drift baseline model

use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, PredictionRow, TrainedForecastModel};
use crate::utils::z_score;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Random walk with drift: the forecast extends the last observation by the
/// mean daily step, with bands widening as the square root of the lead time.
#[derive(Debug, Clone)]
pub struct Drift {
    /// Name of the model
    name: String,
    /// Two-sided confidence level for the uncertainty interval
    confidence_level: f64,
}

/// Trained drift model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedDrift {
    /// Name of the model
    name: String,
    /// Two-sided confidence level for the uncertainty interval
    confidence_level: f64,
    /// Last timestamp of the training history
    last_timestamp: DateTime<Utc>,
    /// Last observed value
    last_value: f64,
    /// Mean step per day
    drift: f64,
    /// Standard deviation of the per-day steps
    sigma: f64,
    /// Standard normal quantile matching the confidence level
    z: f64,
}

impl Drift {
    /// Create a new model with the given two-sided confidence level.
    pub fn new(confidence_level: f64) -> Result<Self> {
        if confidence_level <= 0.0 || confidence_level >= 1.0 {
            return Err(ForecastError::ValidationError(
                "Confidence level must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Random walk with drift (confidence={confidence_level})"),
            confidence_level,
        })
    }
}

impl ForecastModel for Drift {
    type Trained = TrainedDrift;

    fn train(&self, data: &HistoricalSeries) -> Result<Self::Trained> {
        let points = data.points();
        if points.len() < 2 {
            return Err(ForecastError::DataError(
                "Need at least 2 observations to estimate drift".to_string(),
            ));
        }

        // Per-day steps between consecutive observations; gaps in the
        // calendar scale the step down accordingly.
        let mut steps = Vec::with_capacity(points.len() - 1);
        for pair in points.windows(2) {
            let days = (pair[1].timestamp.date_naive() - pair[0].timestamp.date_naive()).num_days();
            if days <= 0 {
                return Err(ForecastError::DataError(
                    "Consecutive observations must be at least one day apart".to_string(),
                ));
            }
            steps.push((pair[1].value - pair[0].value) / days as f64);
        }

        let n = steps.len() as f64;
        let drift = steps.iter().sum::<f64>() / n;
        let variance = steps.iter().map(|s| (s - drift).powi(2)).sum::<f64>() / n;

        Ok(TrainedDrift {
            name: self.name.clone(),
            confidence_level: self.confidence_level,
            last_timestamp: data.last_timestamp(),
            last_value: points[points.len() - 1].value,
            drift,
            sigma: variance.sqrt(),
            z: z_score(self.confidence_level)?,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedDrift {
    /// Mean step per day
    pub fn drift(&self) -> f64 {
        self.drift
    }
}

impl TrainedForecastModel for TrainedDrift {
    fn last_history_timestamp(&self) -> DateTime<Utc> {
        self.last_timestamp
    }

    fn predict(&self, timestamps: &[DateTime<Utc>]) -> Result<Vec<PredictionRow>> {
        let last_date = self.last_timestamp.date_naive();

        timestamps
            .iter()
            .map(|timestamp| {
                let lead = (timestamp.date_naive() - last_date).num_days() as f64;
                let point = self.last_value + self.drift * lead;
                let margin = self.z * self.sigma * lead.abs().max(1.0).sqrt();

                PredictionRow::new(*timestamp, point, point - margin, point + margin)
            })
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
