//! Historical price series handling and CSV ingestion

use crate::error::{ForecastError, Result};
use crate::utils::canonical_timestamp;
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// One observed (timestamp, value) pair of a historical series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Observation timestamp
    pub timestamp: DateTime<Utc>,
    /// Observed value (daily closing price)
    pub value: f64,
}

/// Ordered historical series backing a forecasting model.
///
/// Timestamps are unique and strictly increasing; the series is never empty.
/// Both invariants are enforced at construction, so the last observation is
/// always a well-defined "last known date".
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalSeries {
    points: Vec<SeriesPoint>,
}

impl HistoricalSeries {
    /// Create a series from observation points, validating ordering.
    pub fn new(points: Vec<SeriesPoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(ForecastError::DataError(
                "Historical series must contain at least one observation".to_string(),
            ));
        }

        for pair in points.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(ForecastError::DataError(format!(
                    "Timestamps must be unique and strictly increasing, found {} after {}",
                    pair[1].timestamp, pair[0].timestamp
                )));
            }
        }

        Ok(Self { points })
    }

    /// Create a series from separate timestamp and value vectors.
    pub fn from_parts(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Timestamp count ({}) doesn't match value count ({})",
                timestamps.len(),
                values.len()
            )));
        }

        let points = timestamps
            .into_iter()
            .zip(values)
            .map(|(timestamp, value)| SeriesPoint { timestamp, value })
            .collect();

        Self::new(points)
    }

    /// Get the observation points
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Get the timestamps as a vector
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Get the observed values as a vector
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// First observation timestamp
    pub fn first_timestamp(&self) -> DateTime<Utc> {
        self.points[0].timestamp
    }

    /// Last observation timestamp, the boundary between history and the
    /// generatable future window
    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.points[self.points.len() - 1].timestamp
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: construction rejects empty series
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Loader turning tabular files into a [`HistoricalSeries`]
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a historical series from a CSV file.
    ///
    /// The time column is detected by name (`date`, `time`, `timestamp`) or
    /// dtype; the value column by name (`close`, then `price`, then `value`).
    /// Date-only cells are stamped at the canonical 04:00:00 UTC time of day.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<HistoricalSeries> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Create a historical series from an existing DataFrame
    pub fn from_dataframe(df: DataFrame) -> Result<HistoricalSeries> {
        let time_column = Self::detect_time_column(&df)?;
        let value_column = Self::detect_value_column(&df, &time_column)?;

        let timestamps = Self::extract_timestamps(&df, &time_column)?;
        let values = Self::extract_values(&df, &value_column)?;

        HistoricalSeries::from_parts(timestamps, values)
    }

    /// Detect the time column in a DataFrame
    fn detect_time_column(df: &DataFrame) -> Result<String> {
        let column_names = df.get_column_names();

        for name in &column_names {
            let lower_name = name.to_lowercase();
            if lower_name.contains("time")
                || lower_name.contains("date")
                || lower_name.contains("timestamp")
            {
                return Ok(name.to_string());
            }
        }

        // Fall back to the first temporal column
        for col in df.get_columns() {
            if col.dtype().is_temporal() {
                return Ok(col.name().to_string());
            }
        }

        Err(ForecastError::DataError(
            "No time column found in data".to_string(),
        ))
    }

    /// Detect the observed-value column in a DataFrame
    fn detect_value_column(df: &DataFrame, time_column: &str) -> Result<String> {
        let column_names = df.get_column_names();

        for candidate in ["close", "price", "value"] {
            for name in &column_names {
                if name.to_lowercase().contains(candidate) {
                    return Ok(name.to_string());
                }
            }
        }

        // Fall back to the first numeric column that isn't the time column
        for col in df.get_columns() {
            if col.name() != time_column && col.dtype().is_numeric() {
                return Ok(col.name().to_string());
            }
        }

        Err(ForecastError::DataError(
            "No value column found in data".to_string(),
        ))
    }

    /// Extract a column as UTC timestamps
    fn extract_timestamps(df: &DataFrame, column: &str) -> Result<Vec<DateTime<Utc>>> {
        let col = df.column(column)?;

        match col.dtype() {
            DataType::Datetime(unit, _) => {
                let per_second: i64 = match unit {
                    TimeUnit::Nanoseconds => 1_000_000_000,
                    TimeUnit::Microseconds => 1_000_000,
                    TimeUnit::Milliseconds => 1_000,
                };
                let nanos_per_tick = 1_000_000_000 / per_second;

                col.datetime()?
                    .into_iter()
                    .map(|opt_ts| {
                        let ts = opt_ts.ok_or_else(|| {
                            ForecastError::DataError(format!("Null timestamp in column '{column}'"))
                        })?;
                        let secs = ts.div_euclid(per_second);
                        let nanos = (ts.rem_euclid(per_second) * nanos_per_tick) as u32;
                        NaiveDateTime::from_timestamp_opt(secs, nanos)
                            .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
                            .ok_or_else(|| {
                                ForecastError::DataError(format!(
                                    "Timestamp {ts} in column '{column}' is out of range"
                                ))
                            })
                    })
                    .collect()
            }
            DataType::Date => col
                .date()?
                .into_iter()
                .map(|opt_days| {
                    let days = opt_days.ok_or_else(|| {
                        ForecastError::DataError(format!("Null date in column '{column}'"))
                    })?;
                    NaiveDate::from_ymd_opt(1970, 1, 1)
                        .and_then(|epoch| epoch.checked_add_days(Days::new(days as u64)))
                        .map(canonical_timestamp)
                        .ok_or_else(|| {
                            ForecastError::DataError(format!(
                                "Date {days} in column '{column}' is out of range"
                            ))
                        })
                })
                .collect(),
            DataType::Utf8 => col
                .utf8()?
                .into_iter()
                .map(|opt_str| {
                    let raw = opt_str.ok_or_else(|| {
                        ForecastError::DataError(format!("Null date in column '{column}'"))
                    })?;
                    Self::parse_timestamp(raw)
                })
                .collect(),
            other => Err(ForecastError::DataError(format!(
                "Column '{column}' has unsupported time dtype {other}"
            ))),
        }
    }

    /// Parse a single textual date or datetime cell
    fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
            }
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(canonical_timestamp)
            .map_err(|e| ForecastError::DataError(format!("Unparseable date '{raw}': {e}")))
    }

    /// Extract a column as f64 values
    fn extract_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
        let col = df.column(column)?;

        match col.dtype() {
            DataType::Float64 => Ok(col.f64()?.into_iter().flatten().collect()),
            DataType::Float32 => Ok(col
                .f32()?
                .into_iter()
                .flatten()
                .map(|v| v as f64)
                .collect()),
            DataType::Int64 => Ok(col
                .i64()?
                .into_iter()
                .flatten()
                .map(|v| v as f64)
                .collect()),
            DataType::Int32 => Ok(col
                .i32()?
                .into_iter()
                .flatten()
                .map(|v| v as f64)
                .collect()),
            _ => Err(ForecastError::DataError(format!(
                "Column '{column}' cannot be converted to f64"
            ))),
        }
    }
}
