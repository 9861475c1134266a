use chrono::{Duration, NaiveDate};
use price_forecast::data::HistoricalSeries;
use price_forecast::models::trend_seasonal::TrendSeasonal;
use price_forecast::models::ForecastModel;
use price_forecast::query::ForecastQueryService;
use price_forecast::utils::canonical_timestamp;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    println!("Price Forecast: Single Date Query Example");
    println!("=========================================\n");

    println!("Creating sample history...");
    let series = create_sample_history();
    println!(
        "History: {} observations, last date {}\n",
        series.len(),
        series.last_timestamp().date_naive()
    );

    println!("Training model...");
    let model = TrendSeasonal::new(0.95)?;
    let trained = model.train(&series)?;
    let service = ForecastQueryService::new(trained);

    // A date well past the end of history
    let target = NaiveDate::from_ymd_opt(2024, 12, 12).unwrap();
    println!("Querying {target}...\n");

    let result = service.predict_single(target)?;
    match result.single() {
        Some(row) => {
            println!("Prediction for {}", row.timestamp);
            println!("  Predicted closing price: ${:.2}", row.point_estimate);
            println!("  Lower bound:             ${:.2}", row.lower_bound);
            println!("  Upper bound:             ${:.2}", row.upper_bound);
        }
        None => println!("No prediction available for the selected date."),
    }

    // A date before the training history: a valid empty outcome
    let past = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let empty = service.predict_single(past)?;
    println!("\nQuerying {past}...");
    if empty.is_empty() {
        println!("No prediction available for the selected date.");
    }

    Ok(())
}

/// Sample daily closing prices with a trend and weekly seasonality
fn create_sample_history() -> HistoricalSeries {
    let start = NaiveDate::from_ymd_opt(2024, 8, 3).unwrap();
    let mut timestamps = Vec::with_capacity(120);
    let mut prices = Vec::with_capacity(120);

    for i in 0..120 {
        let date = start + Duration::days(i);
        timestamps.push(canonical_timestamp(date));

        let weekly = ((i % 7) as f64 * std::f64::consts::PI / 7.0).sin() * 0.8;
        let wobble = (i as f64 * 0.31).sin() * 0.5;
        prices.push(55.0 + 0.12 * i as f64 + weekly + wobble);
    }

    HistoricalSeries::from_parts(timestamps, prices).unwrap()
}
