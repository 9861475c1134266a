use chrono::{Duration, NaiveDate};
use price_forecast::artifact::ModelArtifact;
use price_forecast::data::HistoricalSeries;
use price_forecast::error::ForecastError;
use price_forecast::models::drift::Drift;
use price_forecast::models::trend_seasonal::TrendSeasonal;
use price_forecast::models::{ForecastModel, TrainedForecastModel};
use price_forecast::utils::{canonical_timestamp, future_timestamps};
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn training_series() -> HistoricalSeries {
    let start = NaiveDate::from_ymd_opt(2024, 10, 2).unwrap();
    let timestamps = (0..60)
        .map(|i| canonical_timestamp(start + Duration::days(i)))
        .collect();
    let values = (0..60).map(|i| 100.0 + 0.5 * i as f64).collect();

    HistoricalSeries::from_parts(timestamps, values).unwrap()
}

#[test]
fn test_trend_artifact_roundtrip() {
    let series = training_series();
    let trained = TrendSeasonal::new(0.95).unwrap().train(&series).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("trend.json");

    let artifact = ModelArtifact::from(trained.clone());
    artifact.save(&path).unwrap();
    let loaded = ModelArtifact::load(&path).unwrap();

    assert_eq!(loaded.name(), artifact.name());
    assert_eq!(
        loaded.last_history_timestamp(),
        trained.last_history_timestamp()
    );

    // The reloaded model predicts exactly what the original does
    let window = future_timestamps(trained.last_history_timestamp(), 10);
    assert_eq!(
        loaded.predict(&window).unwrap(),
        trained.predict(&window).unwrap()
    );
}

#[test]
fn test_drift_artifact_roundtrip() {
    let series = training_series();
    let trained = Drift::new(0.90).unwrap().train(&series).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("drift.json");

    ModelArtifact::from(trained.clone()).save(&path).unwrap();
    let loaded = ModelArtifact::load(&path).unwrap();

    let window = future_timestamps(trained.last_history_timestamp(), 5);
    assert_eq!(
        loaded.predict(&window).unwrap(),
        trained.predict(&window).unwrap()
    );
}

#[test]
fn test_missing_artifact_is_model_unavailable() {
    let result = ModelArtifact::load("no_such_artifact.json");

    assert!(matches!(
        result,
        Err(ForecastError::ModelUnavailable(_))
    ));
}

#[test]
fn test_corrupt_artifact_is_model_unavailable() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "this is not a model artifact").unwrap();

    let result = ModelArtifact::load(file.path());

    assert!(matches!(
        result,
        Err(ForecastError::ModelUnavailable(_))
    ));
}

#[test]
fn test_truncated_artifact_is_model_unavailable() {
    // Valid JSON prefix cut mid-document
    let series = training_series();
    let trained = TrendSeasonal::new(0.95).unwrap().train(&series).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("trend.json");
    ModelArtifact::from(trained).save(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, &raw[..raw.len() / 2]).unwrap();

    assert!(matches!(
        ModelArtifact::load(&path),
        Err(ForecastError::ModelUnavailable(_))
    ));
}
