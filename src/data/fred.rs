//! FRED API integration for constant-maturity Treasury yields.

use chrono::{Duration, Local, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::curve::{CurvePoint, YieldCurve};
use crate::error::AppError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// Tenor (years) to FRED constant-maturity Treasury series.
pub const TREASURY_SERIES: [(f64, &str); 10] = [
    (0.25, "DGS3MO"),
    (0.5, "DGS6MO"),
    (1.0, "DGS1"),
    (2.0, "DGS2"),
    (3.0, "DGS3"),
    (5.0, "DGS5"),
    (7.0, "DGS7"),
    (10.0, "DGS10"),
    (20.0, "DGS20"),
    (30.0, "DGS30"),
];

/// The latest usable observation of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesObservation {
    pub series_id: String,
    pub tenor_years: f64,
    pub date: NaiveDate,
    /// Decimal yield (FRED quotes percent).
    pub yield_decimal: f64,
}

/// A Treasury curve assembled from the latest observation of each series.
#[derive(Debug, Clone)]
pub struct TreasurySnapshot {
    /// Latest observation date across series.
    pub asof_date: NaiveDate,
    pub observations: Vec<SeriesObservation>,
    pub curve: YieldCurve,
}

impl TreasurySnapshot {
    /// Build a snapshot from per-series observations.
    pub fn from_observations(observations: Vec<SeriesObservation>) -> Result<Self, AppError> {
        let asof_date = observations
            .iter()
            .map(|o| o.date)
            .max()
            .ok_or_else(|| AppError::new(4, "No Treasury observations returned by FRED."))?;

        let curve = YieldCurve::new(
            observations
                .iter()
                .map(|o| CurvePoint::new(o.tenor_years, o.yield_decimal))
                .collect(),
        )
        .map_err(|e| AppError::new(4, format!("Invalid Treasury curve from FRED: {e}")))?;

        Ok(Self {
            asof_date,
            observations,
            curve,
        })
    }

    /// Series whose latest observation predates the snapshot date.
    pub fn stale_series(&self) -> Vec<&SeriesObservation> {
        self.observations
            .iter()
            .filter(|o| o.date < self.asof_date)
            .collect()
    }
}

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::new(2, "Missing FRED_API_KEY in environment (.env)."))?;
        Ok(Self::with_api_key(api_key))
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Fetch the latest Treasury curve within `lookback_days` of today.
    pub fn fetch_treasury_curve(&self, lookback_days: i64) -> Result<TreasurySnapshot, AppError> {
        if lookback_days <= 0 {
            return Err(AppError::new(2, "Lookback window must be > 0 days."));
        }
        let end = Local::now().date_naive();
        let start = end - Duration::days(lookback_days);

        let mut observations = Vec::with_capacity(TREASURY_SERIES.len());
        for &(tenor_years, series_id) in &TREASURY_SERIES {
            let obs = self.fetch_series(series_id, start, end)?;
            let (date, percent) = latest_observation(&obs).ok_or_else(|| {
                AppError::new(
                    4,
                    format!("No observations for {series_id} between {start} and {end}."),
                )
            })?;
            debug!(series_id, %date, percent, "latest observation");
            observations.push(SeriesObservation {
                series_id: series_id.to_string(),
                tenor_years,
                date,
                yield_decimal: percent / 100.0,
            });
        }

        let snapshot = TreasurySnapshot::from_observations(observations)?;
        info!(asof = %snapshot.asof_date, points = snapshot.curve.len(), "fetched Treasury curve");
        Ok(snapshot)
    }

    fn fetch_series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>, AppError> {
        debug!(series_id, %start, %end, "requesting FRED series");
        let start = start.to_string();
        let end = end.to_string();
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("observation_start", start.as_str()),
                ("observation_end", end.as_str()),
            ])
            .send()
            .map_err(|e| AppError::new(4, format!("FRED request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("FRED request for {series_id} failed with status {}.", resp.status()),
            ));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse FRED response: {e}")))?;

        parse_observations(body.observations)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

fn parse_observations(raw: Vec<Observation>) -> Result<Vec<(NaiveDate, f64)>, AppError> {
    let mut out = Vec::with_capacity(raw.len());
    for obs in raw {
        let Some(value) = parse_value(&obs.value) else {
            debug!(date = %obs.date, value = %obs.value, "skipping missing FRED value");
            continue;
        };
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
            .map_err(|e| AppError::new(4, format!("Invalid FRED date '{}': {e}", obs.date)))?;
        out.push((date, value));
    }
    Ok(out)
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}

fn latest_observation(obs: &[(NaiveDate, f64)]) -> Option<(NaiveDate, f64)> {
    obs.iter().copied().max_by_key(|(d, _)| *d)
}
