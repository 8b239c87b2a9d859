//! Coordinate parsing and proximity

use crate::{Result, WildlifeError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where sightings without usable coordinates are placed (Singapore centre)
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 1.3521,
    lng: 103.8198,
};

/// Points closer than this many degrees are treated as the same place.
/// 0.001° is roughly 111 m at the equator.
pub const PROXIMITY_THRESHOLD_DEG: f64 = 0.001;

pub const UNKNOWN_LOCATION: &str = "Unknown Location";

static COORDINATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-?\d+\.?\d*),\s*(-?\d+\.?\d*)").expect("valid coordinate pattern"));

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Extract a `"lat, lng"` pair from free text.
    ///
    /// Returns `None` when no pair is found or it is out of range.
    pub fn parse(text: &str) -> Option<Self> {
        let captures = COORDINATE_PATTERN.captures(text)?;
        let lat = captures.get(1)?.as_str().parse().ok()?;
        let lng = captures.get(2)?.as_str().parse().ok()?;
        let point = Self::new(lat, lng);
        point.is_valid().then_some(point)
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Planar distance in degrees; adequate at the scale of a marker
    pub fn degree_distance(&self, other: &LatLng) -> f64 {
        let d_lat = self.lat - other.lat;
        let d_lng = self.lng - other.lng;
        (d_lat * d_lat + d_lng * d_lng).sqrt()
    }

    pub fn is_near(&self, other: &LatLng) -> bool {
        self.degree_distance(other) <= PROXIMITY_THRESHOLD_DEG
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

impl FromStr for LatLng {
    type Err = WildlifeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            WildlifeError::validation(format!(
                "Invalid coordinates '{}': expected \"lat, lng\" within range",
                s
            ))
        })
    }
}
