//! Trend plus weekly seasonality decomposition model

use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, PredictionRow, TrainedForecastModel};
use crate::utils::z_score;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Additive decomposition model: least-squares linear trend, day-of-week
/// component, residual-spread uncertainty bands.
#[derive(Debug, Clone)]
pub struct TrendSeasonal {
    /// Name of the model
    name: String,
    /// Two-sided confidence level for the uncertainty interval
    confidence_level: f64,
}

/// Trained trend + weekly seasonality model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedTrendSeasonal {
    /// Name of the model
    name: String,
    /// Two-sided confidence level for the uncertainty interval
    confidence_level: f64,
    /// First timestamp of the training history (trend origin)
    train_start: DateTime<Utc>,
    /// Last timestamp of the training history
    last_timestamp: DateTime<Utc>,
    /// Trend intercept at the origin
    intercept: f64,
    /// Trend slope per day
    slope: f64,
    /// Additive day-of-week components, indexed from Monday
    weekday_effects: [f64; 7],
    /// Residual standard deviation after trend and seasonality
    sigma: f64,
    /// Standard normal quantile matching the confidence level
    z: f64,
    /// Number of training observations
    observations: usize,
}

impl TrendSeasonal {
    /// Create a new model with the given two-sided confidence level.
    pub fn new(confidence_level: f64) -> Result<Self> {
        if confidence_level <= 0.0 || confidence_level >= 1.0 {
            return Err(ForecastError::ValidationError(
                "Confidence level must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Trend + weekly seasonality (confidence={confidence_level})"),
            confidence_level,
        })
    }
}

impl ForecastModel for TrendSeasonal {
    type Trained = TrainedTrendSeasonal;

    fn train(&self, data: &HistoricalSeries) -> Result<Self::Trained> {
        let values = data.values();
        let timestamps = data.timestamps();
        if values.len() < 2 {
            return Err(ForecastError::DataError(
                "Need at least 2 observations to fit a trend".to_string(),
            ));
        }

        let train_start = data.first_timestamp();
        let origin = train_start.date_naive();
        let xs: Vec<f64> = timestamps
            .iter()
            .map(|t| (t.date_naive() - origin).num_days() as f64)
            .collect();

        let n = values.len() as f64;
        let x_mean = xs.iter().sum::<f64>() / n;
        let y_mean = values.iter().sum::<f64>() / n;

        let denominator: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
        if denominator == 0.0 {
            return Err(ForecastError::DataError(
                "Training history spans a single day, cannot fit a daily trend".to_string(),
            ));
        }

        let numerator: f64 = xs
            .iter()
            .zip(&values)
            .map(|(x, y)| (x - x_mean) * (y - y_mean))
            .sum();
        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        let residuals: Vec<f64> = xs
            .iter()
            .zip(&values)
            .map(|(x, y)| y - (intercept + slope * x))
            .collect();

        // Mean residual per weekday; weekdays absent from the history keep
        // a zero component.
        let mut sums = [0.0_f64; 7];
        let mut counts = [0_usize; 7];
        for (timestamp, residual) in timestamps.iter().zip(&residuals) {
            let weekday = timestamp.weekday().num_days_from_monday() as usize;
            sums[weekday] += residual;
            counts[weekday] += 1;
        }

        let mut weekday_effects = [0.0_f64; 7];
        for weekday in 0..7 {
            if counts[weekday] > 0 {
                weekday_effects[weekday] = sums[weekday] / counts[weekday] as f64;
            }
        }

        let variance: f64 = timestamps
            .iter()
            .zip(&residuals)
            .map(|(timestamp, residual)| {
                let weekday = timestamp.weekday().num_days_from_monday() as usize;
                (residual - weekday_effects[weekday]).powi(2)
            })
            .sum::<f64>()
            / n;

        Ok(TrainedTrendSeasonal {
            name: self.name.clone(),
            confidence_level: self.confidence_level,
            train_start,
            last_timestamp: data.last_timestamp(),
            intercept,
            slope,
            weekday_effects,
            sigma: variance.sqrt(),
            z: z_score(self.confidence_level)?,
            observations: values.len(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedTrendSeasonal {
    /// Two-sided confidence level of the uncertainty interval
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Trend slope per day
    pub fn slope(&self) -> f64 {
        self.slope
    }
}

impl TrainedForecastModel for TrainedTrendSeasonal {
    fn last_history_timestamp(&self) -> DateTime<Utc> {
        self.last_timestamp
    }

    fn predict(&self, timestamps: &[DateTime<Utc>]) -> Result<Vec<PredictionRow>> {
        let origin = self.train_start.date_naive();
        let last_date = self.last_timestamp.date_naive();

        timestamps
            .iter()
            .map(|timestamp| {
                let x = (timestamp.date_naive() - origin).num_days() as f64;
                let weekday = timestamp.weekday().num_days_from_monday() as usize;
                let point = self.intercept + self.slope * x + self.weekday_effects[weekday];

                // Bands widen the further the request sits beyond history.
                let ahead = (timestamp.date_naive() - last_date).num_days().max(0) as f64;
                let margin =
                    self.z * self.sigma * (1.0 + ahead / self.observations as f64).sqrt();

                PredictionRow::new(*timestamp, point, point - margin, point + margin)
            })
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
