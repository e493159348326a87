//! Domain types shared by the forecast pipeline, the scorer and the routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::helpers::{round_1dp, round_2dp, unix_date};

/// Number of daily points in every forecast series.
pub const FORECAST_DAYS: usize = 7;

/// A validated WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Validate raw request values. Missing, non-finite or out-of-range
    /// values are rejected before any pipeline stage runs.
    pub fn new(lat: Option<f64>, lng: Option<f64>) -> Result<Self, AppError> {
        let (lat, lng) = match (lat, lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err(AppError::BadRequest("Invalid coordinates".to_string())),
        };

        // NaN fails every range comparison, so check finiteness first.
        if !lat.is_finite() || !lng.is_finite() {
            return Err(AppError::BadRequest("Invalid coordinates".to_string()));
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::BadRequest("Invalid coordinates".to_string()));
        }

        Ok(Self { lat, lng })
    }
}

/// Where a forecast point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Upstream,
    Fallback,
}

/// One daily forecast sample.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Unix timestamp (seconds)
    pub timestamp: i64,
    /// Combined wave height in metres
    pub total_wave_height: f64,
    /// Wind-sea component in metres
    pub wind_wave_height: f64,
    /// Swell component in metres
    pub swell_height: f64,
    /// Alias of `totalWaveHeight`, kept for older clients
    pub wave_height: f64,
    /// Wind speed
    pub wind_speed: f64,
    /// Wind direction in degrees (0–359)
    pub wind_direction: u16,
    /// Dominant wave period in seconds
    pub period: f64,
    /// Calendar date (UTC) of `timestamp`, `YYYY-MM-DD`
    pub date: String,
    pub source: Source,
}

/// Raw values for building a [`ForecastPoint`].
#[derive(Debug, Clone, Copy)]
pub struct PointValues {
    pub total_wave_height: f64,
    pub wind_wave_height: f64,
    pub swell_height: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub period: f64,
}

impl ForecastPoint {
    /// Build a point, applying the output rounding and keeping `wave_height`
    /// equal to `total_wave_height`.
    pub fn new(timestamp: i64, values: PointValues, source: Source) -> Self {
        let total = round_2dp(values.total_wave_height);
        Self {
            timestamp,
            total_wave_height: total,
            wind_wave_height: round_2dp(values.wind_wave_height),
            swell_height: round_2dp(values.swell_height),
            wave_height: total,
            wind_speed: round_1dp(values.wind_speed),
            wind_direction: (values.wind_direction.round().rem_euclid(360.0)) as u16,
            period: round_1dp(values.period),
            date: unix_date(timestamp),
            source,
        }
    }
}

/// Exactly [`FORECAST_DAYS`] daily points in ascending time order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForecastSeries(Vec<ForecastPoint>);

impl ForecastSeries {
    /// Returns `None` unless `points` has the right length and is strictly
    /// ascending by timestamp.
    pub fn new(points: Vec<ForecastPoint>) -> Option<Self> {
        if points.len() != FORECAST_DAYS {
            return None;
        }
        if points.windows(2).any(|w| w[1].timestamp <= w[0].timestamp) {
            return None;
        }
        Some(Self(points))
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.0
    }

    pub fn into_points(self) -> Vec<ForecastPoint> {
        self.0
    }
}

/// Shape of the bay in front of a spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BayShape {
    Open,
    Enclosed,
}

/// Dominant seabed material at a spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SeabedType {
    Sand,
    SandRock,
    Rock,
    Reef,
    RockReef,
    SandReef,
}

/// A named surf spot. Reference data, never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    pub id: u32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// e.g. "beach_break", "point_break"
    pub break_type: String,
    /// Compass direction the spot faces, e.g. "east"
    pub exposure: String,
    pub bay_shape: BayShape,
    pub seabed_type: SeabedType,
    pub region: String,
}

/// Board the scoring is done for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BoardType {
    Longboard,
    Shortboard,
}

impl std::str::FromStr for BoardType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "longboard" => Ok(BoardType::Longboard),
            "shortboard" => Ok(BoardType::Shortboard),
            other => Err(AppError::BadRequest(format!(
                "Unknown board type '{}', expected 'longboard' or 'shortboard'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(total: f64) -> PointValues {
        PointValues {
            total_wave_height: total,
            wind_wave_height: 0.5,
            swell_height: 0.5,
            wind_speed: 8.04,
            wind_direction: 359.6,
            period: 9.96,
        }
    }

    #[test]
    fn test_coordinate_valid() {
        let c = Coordinate::new(Some(18.5), Some(110.1)).unwrap();
        assert_eq!(c.lat, 18.5);
        assert_eq!(c.lng, 110.1);
    }

    #[test]
    fn test_coordinate_zero_is_valid() {
        assert!(Coordinate::new(Some(0.0), Some(0.0)).is_ok());
    }

    #[test]
    fn test_coordinate_missing() {
        assert!(Coordinate::new(None, Some(110.1)).is_err());
        assert!(Coordinate::new(Some(18.5), None).is_err());
    }

    #[test]
    fn test_coordinate_out_of_range() {
        assert!(Coordinate::new(Some(90.1), Some(0.0)).is_err());
        assert!(Coordinate::new(Some(-90.1), Some(0.0)).is_err());
        assert!(Coordinate::new(Some(0.0), Some(180.5)).is_err());
        assert!(Coordinate::new(Some(0.0), Some(-181.0)).is_err());
    }

    #[test]
    fn test_coordinate_nan() {
        assert!(Coordinate::new(Some(f64::NAN), Some(0.0)).is_err());
        assert!(Coordinate::new(Some(0.0), Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_point_wave_height_alias() {
        let p = ForecastPoint::new(1_771_070_400, values(1.234), Source::Upstream);
        assert_eq!(p.total_wave_height, 1.23);
        assert_eq!(p.wave_height, p.total_wave_height);
        assert_eq!(p.wind_speed, 8.0);
        assert_eq!(p.period, 10.0);
        // 359.6 rounds to 360, which wraps to north
        assert_eq!(p.wind_direction, 0);
        assert_eq!(p.date, "2026-02-14");
    }

    #[test]
    fn test_point_serializes_camel_case() {
        let p = ForecastPoint::new(1_771_070_400, values(1.0), Source::Fallback);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["totalWaveHeight"], 1.0);
        assert_eq!(json["waveHeight"], 1.0);
        assert_eq!(json["source"], "fallback");
        assert!(json.get("total_wave_height").is_none());
    }

    #[test]
    fn test_series_requires_seven_ascending_points() {
        let points: Vec<ForecastPoint> = (0..7)
            .map(|d| ForecastPoint::new(d * 86_400, values(1.0), Source::Upstream))
            .collect();
        assert!(ForecastSeries::new(points.clone()).is_some());
        assert!(ForecastSeries::new(points[..6].to_vec()).is_none());

        let mut reversed = points;
        reversed.reverse();
        assert!(ForecastSeries::new(reversed).is_none());
    }

    #[test]
    fn test_spot_deserializes() {
        let json = serde_json::json!({
            "id": 9,
            "name": "Shimei Bay Big Rock",
            "lat": 18.65725,
            "lng": 110.265098,
            "breakType": "point_break",
            "exposure": "east",
            "bayShape": "open",
            "seabedType": "rock_reef",
            "region": "hainan"
        });
        let spot: Spot = serde_json::from_value(json).unwrap();
        assert_eq!(spot.bay_shape, BayShape::Open);
        assert_eq!(spot.seabed_type, SeabedType::RockReef);
    }

    #[test]
    fn test_board_type_from_str() {
        assert_eq!("Longboard".parse::<BoardType>().unwrap(), BoardType::Longboard);
        assert_eq!("shortboard".parse::<BoardType>().unwrap(), BoardType::Shortboard);
        assert!("foamie".parse::<BoardType>().is_err());
    }
}
