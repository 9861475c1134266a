//! Persistence for trained model artifacts

use crate::error::{ForecastError, Result};
use crate::models::drift::TrainedDrift;
use crate::models::trend_seasonal::TrainedTrendSeasonal;
use crate::models::{PredictionRow, TrainedForecastModel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// A persisted trained model.
///
/// The artifact is a tagged JSON document, so a loaded artifact can be
/// queried without the caller knowing which model kind was saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model", content = "params")]
pub enum ModelArtifact {
    /// Trend + weekly seasonality model
    TrendSeasonal(TrainedTrendSeasonal),
    /// Random walk with drift model
    Drift(TrainedDrift),
}

impl ModelArtifact {
    /// Load an artifact from a JSON file.
    ///
    /// A missing or unreadable file and a corrupt document both mean the
    /// model cannot be used: the error is `ModelUnavailable` and no
    /// prediction must be attempted.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            ForecastError::ModelUnavailable(format!(
                "Cannot read model artifact {}: {e}",
                path.display()
            ))
        })?;

        let artifact: ModelArtifact = serde_json::from_str(&raw).map_err(|e| {
            ForecastError::ModelUnavailable(format!(
                "Corrupt model artifact {}: {e}",
                path.display()
            ))
        })?;

        info!(model = artifact.name(), path = %path.display(), "loaded model artifact");
        Ok(artifact)
    }

    /// Save the artifact as a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| ForecastError::DataError(format!("Cannot serialize artifact: {e}")))?;
        fs::write(path.as_ref(), raw)?;
        info!(model = self.name(), path = %path.as_ref().display(), "saved model artifact");
        Ok(())
    }
}

impl From<TrainedTrendSeasonal> for ModelArtifact {
    fn from(model: TrainedTrendSeasonal) -> Self {
        ModelArtifact::TrendSeasonal(model)
    }
}

impl From<TrainedDrift> for ModelArtifact {
    fn from(model: TrainedDrift) -> Self {
        ModelArtifact::Drift(model)
    }
}

impl TrainedForecastModel for ModelArtifact {
    fn last_history_timestamp(&self) -> DateTime<Utc> {
        match self {
            ModelArtifact::TrendSeasonal(model) => model.last_history_timestamp(),
            ModelArtifact::Drift(model) => model.last_history_timestamp(),
        }
    }

    fn predict(&self, timestamps: &[DateTime<Utc>]) -> Result<Vec<PredictionRow>> {
        match self {
            ModelArtifact::TrendSeasonal(model) => model.predict(timestamps),
            ModelArtifact::Drift(model) => model.predict(timestamps),
        }
    }

    fn name(&self) -> &str {
        match self {
            ModelArtifact::TrendSeasonal(model) => model.name(),
            ModelArtifact::Drift(model) => model.name(),
        }
    }
}
