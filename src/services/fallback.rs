//! Synthetic seven-day forecast, served when the provider cannot be used.
//!
//! This is an approximation to keep the service responsive, not a physical
//! model. Draws are random; only the shape of the output is guaranteed.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::clock::SharedClock;
use crate::errors::AppError;
use crate::models::{
    Coordinate, ForecastPoint, ForecastSeries, PointValues, Source, FORECAST_DAYS,
};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Base wave height range in metres, before the latitude band is applied.
const BASE_WAVE_MIN: f64 = 0.5;
const BASE_WAVE_MAX: f64 = 2.5;

/// Component shares of the base height.
const WIND_WAVE_SHARE_MIN: f64 = 0.3;
const WIND_WAVE_SHARE_MAX: f64 = 0.7;
const SWELL_SHARE_MIN: f64 = 0.2;
const SWELL_SHARE_MAX: f64 = 0.7;

const WIND_SPEED_MIN: f64 = 5.0;
const WIND_SPEED_MAX: f64 = 20.0;
const PERIOD_MIN: f64 = 6.0;
const PERIOD_MAX: f64 = 14.0;

/// Latitudes below this are treated as tropical.
const TROPICAL_LAT: f64 = 20.0;
/// Latitudes at or above this are treated as temperate.
const TEMPERATE_LAT: f64 = 32.0;

/// Wave energy multiplier for the latitude band of `lat`.
pub fn latitude_band_factor(lat: f64) -> f64 {
    if lat < TROPICAL_LAT {
        1.2
    } else if lat < TEMPERATE_LAT {
        1.0
    } else {
        0.8
    }
}

/// Build seven daily fallback points starting at `now`.
pub fn generate_with<R: Rng + ?Sized>(
    coord: Coordinate,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<ForecastSeries, AppError> {
    let start = now.timestamp();
    let band = latitude_band_factor(coord.lat);

    let points = (0..FORECAST_DAYS as i64)
        .map(|day| {
            let base = rng.random_range(BASE_WAVE_MIN..BASE_WAVE_MAX) * band;
            let wind_wave = base * rng.random_range(WIND_WAVE_SHARE_MIN..WIND_WAVE_SHARE_MAX);
            let swell = base * rng.random_range(SWELL_SHARE_MIN..SWELL_SHARE_MAX);
            ForecastPoint::new(
                start + day * SECONDS_PER_DAY,
                PointValues {
                    total_wave_height: base,
                    wind_wave_height: wind_wave,
                    swell_height: swell,
                    wind_speed: rng.random_range(WIND_SPEED_MIN..WIND_SPEED_MAX),
                    wind_direction: f64::from(rng.random_range(0u16..360)),
                    period: rng.random_range(PERIOD_MIN..PERIOD_MAX),
                },
                Source::Fallback,
            )
        })
        .collect();

    ForecastSeries::new(points)
        .ok_or_else(|| AppError::InternalError("Failed to build fallback forecast".to_string()))
}

/// Fallback generator reading time from the injected clock.
#[derive(Clone)]
pub struct FallbackGenerator {
    clock: SharedClock,
}

impl FallbackGenerator {
    pub fn new(clock: SharedClock) -> Self {
        Self { clock }
    }

    pub fn generate(&self, coord: Coordinate) -> Result<ForecastSeries, AppError> {
        generate_with(coord, self.clock.now(), &mut rand::rng())
    }
}
