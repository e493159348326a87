//! Shared helpers for output rounding and date formatting.
//!
//! Rounding goes through `Decimal` with midpoints rounded away from zero,
//! so outputs are stable regardless of platform float formatting. Both
//! rounding helpers return 0.0 for non-finite inputs.

use chrono::DateTime;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

fn round_dp(v: f64, dp: u32) -> f64 {
    if !v.is_finite() {
        tracing::warn!("round_dp received non-finite value {}, defaulting to 0", v);
        return 0.0;
    }
    Decimal::from_f64(v)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// Round to 1 decimal place (wind speed, period).
pub(crate) fn round_1dp(v: f64) -> f64 {
    round_dp(v, 1)
}

/// Round to 2 decimal places (wave heights, scores).
pub(crate) fn round_2dp(v: f64) -> f64 {
    round_dp(v, 2)
}

/// Format a unix timestamp (seconds) as a UTC `YYYY-MM-DD` date.
pub(crate) fn unix_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
