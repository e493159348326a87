//! Coordinate quantization for cache keys.
//!
//! Nearby requests share one upstream answer: both axes are rounded to the
//! nearest 0.1° and stored as integer tenths so that keys compare and hash
//! exactly.

use std::fmt;

use crate::models::Coordinate;

/// Grid cell resolution, in cells per degree.
const CELLS_PER_DEGREE: f64 = 10.0;

/// A 0.1° grid cell.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct CacheKey {
    lat_tenths: i32,
    lng_tenths: i32,
}

impl CacheKey {
    pub fn lat(&self) -> f64 {
        f64::from(self.lat_tenths) / CELLS_PER_DEGREE
    }

    pub fn lng(&self) -> f64 {
        f64::from(self.lng_tenths) / CELLS_PER_DEGREE
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1},{:.1}", self.lat(), self.lng())
    }
}

/// Round a coordinate to its grid cell: `round(x * 10) / 10` per axis.
///
/// Halfway values round up toward +inf on both hemispheres, so -0.05 lands in
/// the 0.0 cell rather than -0.1.
pub fn quantize(coord: Coordinate) -> CacheKey {
    CacheKey {
        lat_tenths: to_tenths(coord.lat),
        lng_tenths: to_tenths(coord.lng),
    }
}

fn to_tenths(degrees: f64) -> i32 {
    (degrees * CELLS_PER_DEGREE + 0.5).floor() as i32
}
