use std::{collections::BTreeMap, path::Path};

use chrono::{Datelike, NaiveDate};
use polars::frame::DataFrame;
use serde::Serialize;

use crate::{
    aggregate::TimeRecord,
    data::frame,
    error::{Error, Result},
};

/// Station measurements: temperature, humidity, rainfall, pressure, wind speed, wind direction.
pub const CLIMATE_METRICS: [&str; 6] = ["TT", "HR", "RR", "PP", "FF", "DD"];

/// One station reading with a valid timestamp.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClimateReading {
    /// Seconds since the Unix epoch, UTC.
    pub timestamp: i64,
    pub year: i32,
    pub month: u32,
    pub ubigeo: Option<String>,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

/// A point of a single-metric series.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub timestamp: i64,
    pub value: Option<f64>,
    pub ubigeo: Option<String>,
    pub year: i32,
    pub month: u32,
}

/// Calendar-month climate aggregates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlyClimate {
    pub year: i32,
    pub month: u32,
    pub temp_avg: Option<f64>,
    pub humidity_avg: Option<f64>,
    pub rain_total: f64,
    pub pressure_avg: Option<f64>,
    pub wind_avg: Option<f64>,
}

/// Weather-station readings in chronological order.
#[derive(Clone, Debug)]
pub struct ClimateDataset {
    readings: Vec<ClimateReading>,
    monthly: Vec<MonthlyClimate>,
    dropped: usize,
}

/// Build a UTC timestamp from calendar fields, if they name a real hour.
fn timestamp(year: f64, month: f64, day: f64, hour: f64) -> Option<(i64, i32, u32)> {
    let integral = |v: f64| (v.fract() == 0.0).then_some(v);
    let date = NaiveDate::from_ymd_opt(
        integral(year)? as i32,
        u32::try_from(integral(month)? as i64).ok()?,
        u32::try_from(integral(day)? as i64).ok()?,
    )?;
    let time = date.and_hms_opt(u32::try_from(integral(hour)? as i64).ok()?, 0, 0)?;
    Some((time.and_utc().timestamp(), date.year(), date.month()))
}

impl ClimateDataset {
    pub fn from_csv(path: &Path) -> Result<Self> { Self::from_dataframe(&frame::read_csv(path)?) }

    pub fn from_csv_str(csv: &str) -> Result<Self> { Self::from_dataframe(&frame::read_csv_str(csv)?) }

    /// Coerce the measurement columns and timestamp every row. Rows whose date fields do not
    /// form a valid date and hour are dropped.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let metrics = CLIMATE_METRICS.iter()
            .map(|name| frame::numeric_column(df, name))
            .collect::<Result<Vec<_>>>()?;
        let [years, months, days, hours] = ["YY", "MM", "DY", "HH"].map(|name| frame::numeric_column(df, name));
        let (years, months, days, hours) = (years?, months?, days?, hours?);
        let ubigeos = frame::optional_string_column(df, "UBIGEO")?;

        let mut readings = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let stamp = match (years[row], months[row], days[row], hours[row]) {
                (Some(y), Some(m), Some(d), Some(h)) => timestamp(y, m, d, h),
                _ => None,
            };
            let Some((timestamp, year, month)) = stamp else { continue };
            let values = CLIMATE_METRICS.iter().zip(&metrics)
                .filter_map(|(name, column)| column[row].map(|v| (name.to_string(), v)))
                .collect();
            readings.push(ClimateReading { timestamp, year, month, ubigeo: ubigeos[row].clone(), values });
        }
        let dropped = df.height() - readings.len();
        readings.sort_by_key(|r| r.timestamp);

        let monthly = monthly(&readings);
        tracing::info!(rows = readings.len(), dropped, months = monthly.len(), "loaded climate dataset");
        Ok(Self { readings, monthly, dropped })
    }

    /// Readings with a valid timestamp, oldest first.
    #[inline] pub fn readings(&self) -> &[ClimateReading] { &self.readings }

    #[inline] pub fn len(&self) -> usize { self.readings.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.readings.is_empty() }

    /// Number of input rows discarded for an invalid date.
    #[inline] pub fn dropped(&self) -> usize { self.dropped }

    /// Calendar-month aggregates, oldest first.
    #[inline] pub fn monthly(&self) -> &[MonthlyClimate] { &self.monthly }

    /// Readings as generic time records.
    pub fn records(&self) -> Vec<TimeRecord> {
        self.readings.iter()
            .map(|r| TimeRecord { timestamp: r.timestamp, values: r.values.clone() })
            .collect()
    }

    /// Earliest and latest year covered.
    pub fn years(&self) -> Option<(i32, i32)> {
        let first = self.readings.iter().map(|r| r.year).min()?;
        let last = self.readings.iter().map(|r| r.year).max()?;
        Some((first, last))
    }

    /// Number of distinct stations.
    pub fn stations(&self) -> usize {
        let mut ids = self.readings.iter().filter_map(|r| r.ubigeo.as_deref()).collect::<Vec<_>>();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Single-metric series, oldest first, optionally restricted to one year.
    ///
    /// `metric` is matched case-insensitively against the station measurement names.
    pub fn timeseries(&self, metric: &str, year: Option<i32>, limit: usize) -> Result<Vec<SeriesPoint>> {
        let metric = metric.to_ascii_uppercase();
        if !CLIMATE_METRICS.contains(&metric.as_str()) {
            return Err(Error::config(format!(
                "unknown climate metric {metric}, expected one of {}", CLIMATE_METRICS.join(", "))))
        }

        Ok(self.readings.iter()
            .filter(|r| year.is_none_or(|y| r.year == y))
            .take(limit)
            .map(|r| SeriesPoint {
                timestamp: r.timestamp,
                value: r.values.get(&metric).copied(),
                ubigeo: r.ubigeo.clone(),
                year: r.year,
                month: r.month,
            })
            .collect())
    }
}

fn monthly(readings: &[ClimateReading]) -> Vec<MonthlyClimate> {
    let mut months: BTreeMap<(i32, u32), Vec<&ClimateReading>> = BTreeMap::new();
    for reading in readings {
        months.entry((reading.year, reading.month)).or_default().push(reading);
    }

    months.into_iter()
        .map(|((year, month), rows)| {
            let column = |name: &str| rows.iter().map(|r| r.values.get(name).copied()).collect::<Vec<_>>();
            MonthlyClimate {
                year,
                month,
                temp_avg: frame::mean(column("TT")),
                humidity_avg: frame::mean(column("HR")),
                rain_total: column("RR").into_iter().flatten().sum(),
                pressure_avg: frame::mean(column("PP")),
                wind_avg: frame::mean(column("FF")),
            }
        })
        .collect()
}
