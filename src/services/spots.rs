//! Surf spot catalogue.
//!
//! Loaded once at startup from a JSON array of spots and read-only after.
//! Coordinates and ids are validated on load so handlers can trust them.

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::models::{Coordinate, Spot};

/// Errors that can occur loading the spot file.
#[derive(Debug, Error)]
pub enum SpotsError {
    #[error("IO error reading spot file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid spot file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate spot id {0}")]
    DuplicateId(u32),
    #[error("Spot {id} has invalid coordinates ({lat}, {lng})")]
    InvalidCoordinates { id: u32, lat: f64, lng: f64 },
}

/// The read-only list of known spots.
#[derive(Debug, Clone, Default)]
pub struct SpotCatalog {
    spots: Vec<Spot>,
}

impl SpotCatalog {
    /// Parse a catalogue from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SpotsError> {
        let spots: Vec<Spot> = serde_json::from_str(json)?;

        let mut seen = HashSet::new();
        for spot in &spots {
            if !seen.insert(spot.id) {
                return Err(SpotsError::DuplicateId(spot.id));
            }
            if Coordinate::new(Some(spot.lat), Some(spot.lng)).is_err() {
                return Err(SpotsError::InvalidCoordinates {
                    id: spot.id,
                    lat: spot.lat,
                    lng: spot.lng,
                });
            }
        }

        Ok(Self { spots })
    }

    pub fn load(path: &Path) -> Result<Self, SpotsError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::info!("Loaded {} spots from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn all(&self) -> &[Spot] {
        &self.spots
    }

    pub fn get(&self, id: u32) -> Option<&Spot> {
        self.spots.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}
