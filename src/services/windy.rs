//! Windy Point Forecast v2 client.
//!
//! Posts one request per unresolved cache miss and maps the provider's
//! suffixed parameter arrays onto daily [`ForecastPoint`]s.
//! See: https://api.windy.com/point-forecast/docs

use rand::Rng;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::models::{ForecastPoint, ForecastSeries, PointValues, Source, FORECAST_DAYS};

/// Provider samples are 3 hours apart, so every 8th sample is one day on.
const SAMPLES_PER_DAY: usize = 8;

/// Only the first week of samples is used.
const MAX_SAMPLES: usize = SAMPLES_PER_DAY * FORECAST_DAYS;

/// Fewest samples that still yield a point for every day.
const MIN_SAMPLES: usize = SAMPLES_PER_DAY * (FORECAST_DAYS - 1) + 1;

/// Sentinels used when a component value is missing from the response.
const DEFAULT_TOTAL_WAVE_M: f64 = 1.0;
const DEFAULT_WIND_WAVE_M: f64 = 0.5;
const DEFAULT_SWELL_M: f64 = 0.5;
const DEFAULT_PERIOD_S: f64 = 10.0;

/// Wind is not requested from the provider; it is estimated from the
/// wind-sea height as `max(5, wind_wave * 12 + noise)`.
const WIND_PER_WIND_WAVE_M: f64 = 12.0;
const WIND_NOISE: f64 = 2.0;
const MIN_DERIVED_WIND: f64 = 5.0;

/// Timestamps above this are in milliseconds rather than seconds.
const MILLIS_THRESHOLD: f64 = 1e11;

const TIMESTAMP_FIELD: &str = "ts";

/// Accepted response keys per logical field, in preference order. The
/// provider has renamed these across model versions.
const TOTAL_WAVE_ALIASES: &[&str] = &["waves_height-surface", "waves-surface"];
const WIND_WAVE_ALIASES: &[&str] = &[
    "wwaves_height-surface",
    "windWaves_height-surface",
    "windWaves-surface",
];
const SWELL_ALIASES: &[&str] = &[
    "swell1_height-surface",
    "swell_height-surface",
    "swell1-surface",
    "swell-surface",
];
const PERIOD_ALIASES: &[&str] = &[
    "waves_period-surface",
    "period-surface",
    "swell1_period-surface",
];

/// Parameters requested from the provider.
const REQUESTED_PARAMETERS: &[&str] = &["waves", "windWaves", "swell1"];
const REQUESTED_LEVELS: &[&str] = &["surface"];

/// Errors talking to the point-forecast provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    #[error("provider returned HTTP {0}")]
    Status(u16),
    #[error("provider request timed out")]
    Timeout,
    #[error("provider request failed: {0}")]
    Transport(String),
    #[error("provider response malformed: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Malformed(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

/// Request body for the point-forecast endpoint.
#[derive(Debug, Serialize)]
struct PointForecastRequest<'a> {
    lat: f64,
    lon: f64,
    model: &'a str,
    parameters: &'a [&'a str],
    levels: &'a [&'a str],
    key: &'a str,
}

/// Client for the Windy point-forecast API.
#[derive(Debug, Clone)]
pub struct WindyClient {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
}

impl WindyClient {
    pub fn new(
        url: &str,
        model: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch a week of daily points for a grid cell.
    pub async fn fetch(&self, lat: f64, lon: f64) -> Result<ForecastSeries, UpstreamError> {
        let body = PointForecastRequest {
            lat,
            lon,
            model: &self.model,
            parameters: REQUESTED_PARAMETERS,
            levels: REQUESTED_LEVELS,
            key: &self.api_key,
        };

        let response = self.client.post(&self.url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status(response.status().as_u16()));
        }

        let raw: Value = response.json().await?;
        parse_point_forecast(&raw, &mut rand::rng())
    }
}

/// Resolve the first alias present in the response as a numeric array.
/// Non-numeric entries become `None`.
fn resolve_series(fields: &Map<String, Value>, aliases: &[&str]) -> Option<Vec<Option<f64>>> {
    aliases.iter().find_map(|alias| {
        fields
            .get(*alias)
            .and_then(Value::as_array)
            .map(|values| values.iter().map(Value::as_f64).collect())
    })
}

fn value_at(series: Option<&Vec<Option<f64>>>, i: usize, default: f64) -> f64 {
    series
        .and_then(|s| s.get(i).copied().flatten())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Convert a provider response into seven daily points.
///
/// Pure apart from `rng`, which supplies the derived-wind noise and the
/// wind direction.
pub fn parse_point_forecast<R: Rng + ?Sized>(
    raw: &Value,
    rng: &mut R,
) -> Result<ForecastSeries, UpstreamError> {
    let fields = raw
        .as_object()
        .ok_or_else(|| UpstreamError::Malformed("response is not a JSON object".to_string()))?;

    let timestamps = resolve_series(fields, &[TIMESTAMP_FIELD])
        .ok_or_else(|| UpstreamError::Malformed("missing timestamp array".to_string()))?;
    let total_wave = resolve_series(fields, TOTAL_WAVE_ALIASES)
        .ok_or_else(|| UpstreamError::Malformed("missing wave height array".to_string()))?;
    let wind_wave = resolve_series(fields, WIND_WAVE_ALIASES);
    let swell = resolve_series(fields, SWELL_ALIASES);
    let period = resolve_series(fields, PERIOD_ALIASES);

    if timestamps.len() < MIN_SAMPLES {
        return Err(UpstreamError::Malformed(format!(
            "expected at least {} samples, got {}",
            MIN_SAMPLES,
            timestamps.len()
        )));
    }

    let mut points = Vec::with_capacity(FORECAST_DAYS);
    for i in (0..timestamps.len().min(MAX_SAMPLES)).step_by(SAMPLES_PER_DAY) {
        let raw_ts = timestamps[i]
            .filter(|t| t.is_finite())
            .ok_or_else(|| UpstreamError::Malformed(format!("invalid timestamp at index {}", i)))?;
        let timestamp = if raw_ts > MILLIS_THRESHOLD {
            (raw_ts / 1000.0) as i64
        } else {
            raw_ts as i64
        };

        let wind_wave_height = value_at(wind_wave.as_ref(), i, DEFAULT_WIND_WAVE_M);
        let noise = rng.random_range(-WIND_NOISE..WIND_NOISE);
        let wind_speed = (wind_wave_height * WIND_PER_WIND_WAVE_M + noise).max(MIN_DERIVED_WIND);

        points.push(ForecastPoint::new(
            timestamp,
            PointValues {
                total_wave_height: value_at(Some(&total_wave), i, DEFAULT_TOTAL_WAVE_M),
                wind_wave_height,
                swell_height: value_at(swell.as_ref(), i, DEFAULT_SWELL_M),
                wind_speed,
                wind_direction: f64::from(rng.random_range(0u16..360)),
                period: value_at(period.as_ref(), i, DEFAULT_PERIOD_S),
            },
            Source::Upstream,
        ));
    }

    ForecastSeries::new(points).ok_or_else(|| {
        UpstreamError::Malformed("timestamps are not strictly ascending".to_string())
    })
}
