//! Surf suitability scoring per board type.

use serde::Serialize;
use utoipa::ToSchema;

use crate::helpers::round_2dp;
use crate::models::{BoardType, ForecastPoint, Source, Spot};
use crate::services::calibration::calibrate;

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// Acceptable and optimal bounds for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub optimal_min: f64,
    pub optimal_max: f64,
}

impl ParameterRange {
    const fn new(min: f64, max: f64, optimal_min: f64, optimal_max: f64) -> Self {
        Self {
            min,
            max,
            optimal_min,
            optimal_max,
        }
    }
}

/// Per-board criteria for wave height (m), period (s) and wind speed.
#[derive(Debug, Clone, Copy)]
pub struct BoardCriteria {
    pub wave_height: ParameterRange,
    pub period: ParameterRange,
    pub wind_speed: ParameterRange,
}

const LONGBOARD: BoardCriteria = BoardCriteria {
    wave_height: ParameterRange::new(0.3, 1.5, 0.5, 1.0),
    period: ParameterRange::new(8.0, 20.0, 10.0, 16.0),
    wind_speed: ParameterRange::new(0.0, 15.0, 0.0, 8.0),
};

const SHORTBOARD: BoardCriteria = BoardCriteria {
    wave_height: ParameterRange::new(0.8, 3.0, 1.2, 2.5),
    period: ParameterRange::new(6.0, 16.0, 8.0, 14.0),
    wind_speed: ParameterRange::new(0.0, 25.0, 5.0, 15.0),
};

pub fn criteria_for(board: BoardType) -> &'static BoardCriteria {
    match board {
        BoardType::Longboard => &LONGBOARD,
        BoardType::Shortboard => &SHORTBOARD,
    }
}

const HEIGHT_WEIGHT: f64 = 0.4;
const PERIOD_WEIGHT: f64 = 0.3;
const WIND_WEIGHT: f64 = 0.3;

/// Ceiling of the factor outside the optimal window.
const RAMP_SCALE: f64 = 0.8;

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score one parameter against its range, in [0, 1].
///
/// Outside `[min, max]` scores 0 and inside the optimal window scores 1.
/// Between the two the factor ramps linearly up to 0.8.
pub fn score_parameter(value: f64, range: &ParameterRange) -> f64 {
    if !value.is_finite() || value < range.min || value > range.max {
        return 0.0;
    }
    if value >= range.optimal_min && value <= range.optimal_max {
        return 1.0;
    }
    if value < range.optimal_min {
        (value - range.min) / (range.optimal_min - range.min) * RAMP_SCALE
    } else {
        (range.max - value) / (range.max - range.optimal_max) * RAMP_SCALE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
    Flat,
}

impl Rating {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Rating::Excellent
        } else if score >= 0.6 {
            Rating::Good
        } else if score >= 0.4 {
            Rating::Fair
        } else if score >= 0.2 {
            Rating::Poor
        } else {
            Rating::Flat
        }
    }
}

fn recommendation(board: BoardType, score: f64) -> &'static str {
    match board {
        BoardType::Longboard => {
            if score >= 0.8 {
                "Perfect longboard conditions: smooth, long-period waves for gliding and nose riding"
            } else if score >= 0.6 {
                "Good longboard conditions for practice and casual sessions"
            } else if score >= 0.4 {
                "Average conditions, fine for beginners to try"
            } else {
                "Conditions are not suitable for longboarding"
            }
        }
        BoardType::Shortboard => {
            if score >= 0.8 {
                "Excellent shortboard conditions: powerful walls for aggressive manoeuvres"
            } else if score >= 0.6 {
                "Good shortboard conditions for working on technique"
            } else if score >= 0.4 {
                "Surfable, but conditions are average"
            } else {
                "Conditions are not suitable for shortboarding"
            }
        }
    }
}

/// Per-parameter factors behind a score.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScoreFactors {
    pub height: f64,
    pub period: f64,
    pub wind: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScoreResult {
    /// Weighted score in [0, 1], rounded to 2 decimals
    pub score: f64,
    pub rating: Rating,
    pub factors: ScoreFactors,
    pub recommendation: String,
}

/// Score a forecast point for `board`, using the point's wave height as is.
pub fn evaluate(spot: &Spot, point: &ForecastPoint, board: BoardType) -> ScoreResult {
    let criteria = criteria_for(board);
    let height = score_parameter(point.wave_height, &criteria.wave_height);
    let period = score_parameter(point.period, &criteria.period);
    let wind = score_parameter(point.wind_speed, &criteria.wind_speed);

    let score = height * HEIGHT_WEIGHT + period * PERIOD_WEIGHT + wind * WIND_WEIGHT;
    tracing::debug!(
        "Scored spot {} on {} for {:?}: {:.3}",
        spot.id,
        point.date,
        board,
        score
    );

    // Rating and recommendation use the unrounded score.
    ScoreResult {
        score: round_2dp(score),
        rating: Rating::from_score(score),
        factors: ScoreFactors {
            height: round_2dp(height),
            period: round_2dp(period),
            wind: round_2dp(wind),
        },
        recommendation: recommendation(board, score).to_string(),
    }
}

/// One scored day for a spot.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayScore {
    pub date: String,
    pub source: Source,
    /// Shore wave height after calibration, in metres
    pub calibrated_wave_height: f64,
    pub period: f64,
    pub wind_speed: f64,
    pub score: ScoreResult,
}

/// Calibrate the point's wave height for the spot, then score it.
pub fn score_day(spot: &Spot, point: &ForecastPoint, board: BoardType) -> DayScore {
    let calibrated_height = round_2dp(calibrate(point.total_wave_height, spot));
    let calibrated = ForecastPoint {
        wave_height: calibrated_height,
        total_wave_height: calibrated_height,
        ..point.clone()
    };

    DayScore {
        date: point.date.clone(),
        source: point.source,
        calibrated_wave_height: calibrated_height,
        period: point.period,
        wind_speed: point.wind_speed,
        score: evaluate(spot, &calibrated, board),
    }
}
