//! Shore wave height from open-water height.
//!
//! A coarse multiplicative proxy for local bathymetry. The factors are
//! hand-tuned per bay shape and seabed, not derived.

use crate::models::{BayShape, SeabedType, Spot};

/// Share of wave energy that reaches the shore after shoaling.
const ENERGY_RETENTION: f64 = 0.9;

/// Calibrated heights never drop below this, in metres.
const MIN_CALIBRATED_HEIGHT: f64 = 0.3;

fn bay_shape_factor(shape: BayShape) -> f64 {
    match shape {
        BayShape::Open => 0.9,
        BayShape::Enclosed => 0.4,
    }
}

fn seabed_factor(seabed: SeabedType) -> f64 {
    match seabed {
        SeabedType::Sand => 0.70,
        SeabedType::SandRock => 0.75,
        SeabedType::Rock => 0.85,
        SeabedType::Reef => 0.90,
        SeabedType::RockReef => 0.80,
        SeabedType::SandReef => 0.75,
    }
}

/// Adjust `base_height` for the spot's bay shape and seabed.
pub fn calibrate(base_height: f64, spot: &Spot) -> f64 {
    let height = base_height
        * bay_shape_factor(spot.bay_shape)
        * seabed_factor(spot.seabed_type)
        * ENERGY_RETENTION;
    height.max(MIN_CALIBRATED_HEIGHT)
}
