use assert_approx_eq::assert_approx_eq;
use chrono::{Duration, NaiveDate};
use price_forecast::data::HistoricalSeries;
use price_forecast::models::drift::Drift;
use price_forecast::models::trend_seasonal::TrendSeasonal;
use price_forecast::models::{ForecastModel, PredictionRow, TrainedForecastModel};
use price_forecast::utils::{canonical_timestamp, future_timestamps};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Daily series of `days` observations starting at `start`, one value per day
fn daily_series<F: Fn(i64) -> f64>(start: NaiveDate, days: i64, value: F) -> HistoricalSeries {
    let timestamps = (0..days)
        .map(|i| canonical_timestamp(start + Duration::days(i)))
        .collect();
    let values = (0..days).map(value).collect();

    HistoricalSeries::from_parts(timestamps, values).unwrap()
}

#[test]
fn test_trend_seasonal_recovers_clean_linear_series() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let series = daily_series(start, 60, |i| 100.0 + 0.5 * i as f64);

    let trained = TrendSeasonal::new(0.95).unwrap().train(&series).unwrap();
    assert_approx_eq!(trained.slope(), 0.5, 1e-9);

    // Ten days past the end of history the trend continues exactly, and a
    // perfect fit leaves no uncertainty margin.
    let target = canonical_timestamp(start + Duration::days(69));
    let rows = trained.predict(&[target]).unwrap();

    assert_eq!(rows.len(), 1);
    assert_approx_eq!(rows[0].point_estimate, 100.0 + 0.5 * 69.0, 1e-9);
    assert_approx_eq!(rows[0].lower_bound, rows[0].point_estimate, 1e-9);
    assert_approx_eq!(rows[0].upper_bound, rows[0].point_estimate, 1e-9);
}

#[test]
fn test_trend_seasonal_learns_weekday_pattern() {
    // Ten complete weeks starting on a Monday; Mondays and Sundays trade
    // one unit above the trend line.
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let series = daily_series(start, 70, |i| {
        let bump = match i % 7 {
            0 | 6 => 1.0,
            _ => 0.0,
        };
        100.0 + 0.5 * i as f64 + bump
    });

    let trained = TrendSeasonal::new(0.95).unwrap().train(&series).unwrap();

    let monday = canonical_timestamp(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    let tuesday = canonical_timestamp(NaiveDate::from_ymd_opt(2024, 3, 12).unwrap());
    let sunday = canonical_timestamp(NaiveDate::from_ymd_opt(2024, 3, 17).unwrap());
    let rows = trained.predict(&[monday, tuesday, sunday]).unwrap();

    assert_approx_eq!(rows[0].point_estimate, 100.0 + 0.5 * 70.0 + 1.0, 1e-6);
    assert_approx_eq!(rows[1].point_estimate, 100.0 + 0.5 * 71.0, 1e-6);
    assert_approx_eq!(rows[2].point_estimate, 100.0 + 0.5 * 76.0 + 1.0, 1e-6);
}

#[test]
fn test_drift_extends_last_value() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let series = daily_series(start, 30, |i| 200.0 + 2.0 * i as f64);

    let trained = Drift::new(0.95).unwrap().train(&series).unwrap();
    assert_approx_eq!(trained.drift(), 2.0, 1e-9);

    let target = canonical_timestamp(start + Duration::days(32));
    let rows = trained.predict(&[target]).unwrap();

    // Last value 258.0, three days ahead at 2.0 per day
    assert_approx_eq!(rows[0].point_estimate, 264.0, 1e-9);
}

#[test]
fn test_models_report_last_history_timestamp() {
    let start = NaiveDate::from_ymd_opt(2024, 10, 2).unwrap();
    let series = daily_series(start, 60, |i| 100.0 + i as f64);
    let last = canonical_timestamp(NaiveDate::from_ymd_opt(2024, 11, 30).unwrap());

    let trend = TrendSeasonal::new(0.95).unwrap().train(&series).unwrap();
    let drift = Drift::new(0.95).unwrap().train(&series).unwrap();

    assert_eq!(trend.last_history_timestamp(), last);
    assert_eq!(drift.last_history_timestamp(), last);
}

#[test]
fn test_bounds_invariant_on_noisy_data() {
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 2.0).unwrap();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let timestamps: Vec<_> = (0..120)
        .map(|i| canonical_timestamp(start + Duration::days(i)))
        .collect();
    let values: Vec<f64> = (0..120)
        .map(|i| 100.0 + 0.3 * i as f64 + noise.sample(&mut rng))
        .collect();
    let series = HistoricalSeries::from_parts(timestamps, values).unwrap();

    let window = future_timestamps(series.last_timestamp(), 14);

    let trend = TrendSeasonal::new(0.95).unwrap().train(&series).unwrap();
    let drift = Drift::new(0.95).unwrap().train(&series).unwrap();

    for rows in [
        trend.predict(&window).unwrap(),
        drift.predict(&window).unwrap(),
    ] {
        assert_eq!(rows.len(), 14);
        for row in rows {
            assert!(row.lower_bound <= row.point_estimate);
            assert!(row.point_estimate <= row.upper_bound);
            // Noisy history must produce a real interval
            assert!(row.upper_bound > row.lower_bound);
        }
    }
}

#[test]
fn test_model_parameter_validation() {
    assert!(TrendSeasonal::new(0.0).is_err());
    assert!(TrendSeasonal::new(1.0).is_err());
    assert!(TrendSeasonal::new(1.5).is_err());
    assert!(Drift::new(-0.1).is_err());
    assert!(Drift::new(0.95).is_ok());
}

#[test]
fn test_training_requires_enough_history() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let single = daily_series(start, 1, |_| 100.0);

    assert!(TrendSeasonal::new(0.95).unwrap().train(&single).is_err());
    assert!(Drift::new(0.95).unwrap().train(&single).is_err());
}

#[test]
fn test_prediction_row_rejects_inverted_bounds() {
    let timestamp = canonical_timestamp(NaiveDate::from_ymd_opt(2024, 12, 12).unwrap());

    assert!(PredictionRow::new(timestamp, 1.0, 2.0, 0.5).is_err());
    assert!(PredictionRow::new(timestamp, 1.0, 0.5, 2.0).is_ok());
    // Degenerate interval is allowed
    assert!(PredictionRow::new(timestamp, 1.0, 1.0, 1.0).is_ok());
}
