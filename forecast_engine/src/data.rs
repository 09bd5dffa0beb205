//! Observation ingest and daily series preprocessing

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A single timestamped measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Epoch milliseconds
    pub timestamp: i64,
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Calendar day (UTC) the observation falls on, if representable
    pub fn day(&self) -> Option<NaiveDate> {
        Utc.timestamp_millis_opt(self.timestamp)
            .single()
            .map(|dt| dt.date_naive())
    }
}

/// Input accepted by the analysis entry points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum SeriesInput {
    /// An already evenly spaced series
    Values(Vec<f64>),
    /// Raw timestamped observations, bucketed into days first
    Observations(Vec<Observation>),
}

impl SeriesInput {
    /// Resolve the input into a daily series
    pub fn into_daily_series(self) -> DailySeries {
        match self {
            SeriesInput::Values(values) => DailySeries::from_values(&values),
            SeriesInput::Observations(observations) => daily_series(&observations),
        }
    }
}

/// Evenly spaced daily values with their calendar anchor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySeries {
    start_date: Option<NaiveDate>,
    values: Vec<f64>,
}

impl DailySeries {
    /// Series with no calendar anchor; non-finite values are dropped
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            start_date: None,
            values: values.iter().copied().filter(|v| v.is_finite()).collect(),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First day of the series, if it came from observations
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Last day of the series, if it came from observations
    pub fn end_date(&self) -> Option<NaiveDate> {
        let start = self.start_date?;
        let offset = self.values.len().checked_sub(1)?;
        Some(start + Duration::days(offset as i64))
    }

    /// The `horizon` days following the last day of the series
    pub fn forecast_dates(&self, horizon: usize) -> Option<Vec<NaiveDate>> {
        let last = self.end_date()?;
        Some(
            (1..=horizon)
                .map(|k| last + Duration::days(k as i64))
                .collect(),
        )
    }
}

/// Bucket observations into UTC days and fill the gaps.
///
/// Values falling on the same day are summed. Observations with a
/// non-finite value or an unrepresentable timestamp are ignored. The
/// result has one value per day from the first to the last bucket.
pub fn daily_series(observations: &[Observation]) -> DailySeries {
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for obs in observations.iter().filter(|o| o.value.is_finite()) {
        if let Some(day) = obs.day() {
            *buckets.entry(day).or_insert(0.0) += obs.value;
        }
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return DailySeries::default();
    };

    let span = (last - first).num_days() as usize + 1;
    let mut slots = vec![None; span];
    for (day, total) in &buckets {
        slots[(*day - first).num_days() as usize] = Some(*total);
    }

    DailySeries {
        start_date: Some(first),
        values: fill_gaps(&slots),
    }
}

/// Fill missing slots.
///
/// Interior gaps are linearly interpolated between their neighbours,
/// leading gaps take the first known value, trailing gaps take the last
/// known value, and a series with no known value at all is zero.
pub fn fill_gaps(slots: &[Option<f64>]) -> Vec<f64> {
    let mut values = vec![0.0; slots.len()];
    let known: Vec<(usize, f64)> = slots
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();

    let (Some(&(first_idx, first_val)), Some(&(last_idx, last_val))) = (known.first(), known.last())
    else {
        return values;
    };

    values[..first_idx].fill(first_val);
    values[last_idx + 1..].fill(last_val);

    for pair in known.windows(2) {
        let (a, va) = pair[0];
        let (b, vb) = pair[1];
        let steps = (b - a) as f64;
        for (offset, slot) in values[a..b].iter_mut().enumerate() {
            *slot = va + (vb - va) * offset as f64 / steps;
        }
    }
    values[last_idx] = last_val;

    values
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    timestamp: String,
    value: String,
}

fn parse_timestamp(raw: &str) -> Option<i64> {
    if let Ok(millis) = raw.parse::<i64>() {
        return Some(millis);
    }
    if let Ok(millis) = raw.parse::<f64>() {
        return millis.is_finite().then_some(millis as i64);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt).timestamp_millis())
}

fn parse_record(record: &RawRecord) -> Option<Observation> {
    let timestamp = parse_timestamp(&record.timestamp)?;
    let value = record.value.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(Observation::new(timestamp, value))
}

/// Loader for observation files
#[derive(Debug)]
pub struct ObservationLoader;

impl ObservationLoader {
    /// Load observations from a CSV file with `timestamp` and `value` columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Read observations from CSV.
    ///
    /// Timestamps may be epoch milliseconds, RFC 3339 or `YYYY-MM-DD`.
    /// Rows that do not parse are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Observation>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        for required in ["timestamp", "value"] {
            if !headers.iter().any(|h| h == required) {
                return Err(ForecastError::DataError(format!(
                    "Missing '{}' column in observation data",
                    required
                )));
            }
        }

        let mut observations = Vec::new();
        for (row, record) in rdr.deserialize::<RawRecord>().enumerate() {
            match record.ok().as_ref().and_then(parse_record) {
                Some(obs) => observations.push(obs),
                None => debug!("Skipping unparseable observation row {}", row + 1),
            }
        }

        Ok(observations)
    }

    /// Load observations from a JSON array of `{timestamp, value}` objects
    pub fn from_json_str(json: &str) -> Result<Vec<Observation>> {
        Ok(serde_json::from_str(json)?)
    }
}
