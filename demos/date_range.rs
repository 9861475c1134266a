use chrono::{Duration, NaiveDate};
use price_forecast::artifact::ModelArtifact;
use price_forecast::data::HistoricalSeries;
use price_forecast::models::drift::Drift;
use price_forecast::models::{ForecastModel, TrainedForecastModel};
use price_forecast::query::ForecastQueryService;
use price_forecast::utils::canonical_timestamp;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    println!("Price Forecast: Date Range Query Example");
    println!("========================================\n");

    let series = create_sample_history();
    println!(
        "History: {} observations, last date {}",
        series.len(),
        series.last_timestamp().date_naive()
    );

    // Fit, persist, reload: the query path only ever sees the artifact.
    let trained = Drift::new(0.95)?.train(&series)?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("model.json");
    ModelArtifact::from(trained).save(&path)?;

    let artifact = ModelArtifact::load(&path)?;
    println!("Loaded artifact: {}\n", artifact.name());

    let service = ForecastQueryService::new(artifact);

    let start = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 12, 14).unwrap();
    println!("Querying {start} through {end}...\n");

    let result = service.predict_range(start, end)?;
    if result.is_empty() {
        println!("No prediction available for the selected range.");
        return Ok(());
    }

    for row in &result {
        println!(
            "  {}  ${:7.2}  (${:7.2} .. ${:7.2})",
            row.timestamp.date_naive(),
            row.point_estimate,
            row.lower_bound,
            row.upper_bound
        );
    }

    println!("\nDownloadable CSV:\n");
    print!("{}", result.to_csv()?);

    // An inverted range is rejected before the model runs
    println!("\nQuerying an inverted range...");
    match service.predict_range(end, start) {
        Err(e) => println!("Rejected: {e}"),
        Ok(_) => unreachable!("inverted ranges are always rejected"),
    }

    Ok(())
}

/// Sample daily closing prices drifting upward
fn create_sample_history() -> HistoricalSeries {
    let start = NaiveDate::from_ymd_opt(2024, 8, 3).unwrap();
    let mut timestamps = Vec::with_capacity(120);
    let mut prices = Vec::with_capacity(120);

    for i in 0..120 {
        timestamps.push(canonical_timestamp(start + Duration::days(i)));
        prices.push(55.0 + 0.12 * i as f64 + (i as f64 * 0.27).cos() * 0.4);
    }

    HistoricalSeries::from_parts(timestamps, prices).unwrap()
}
