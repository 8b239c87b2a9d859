//! Display-ready sighting records

use crate::geo::UNKNOWN_LOCATION;
use crate::Sighting;
use serde::Serialize;

pub const UNKNOWN_SPECIES: &str = "Unknown Species";
pub const UNKNOWN_TYPE: &str = "Unknown Type";
pub const UNKNOWN_DATE: &str = "Unknown Date";
pub const UNKNOWN_TIME: &str = "Unknown Time";

/// A sighting flattened for lists and map markers, with blanks filled in
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingView {
    pub id: String,
    pub species: String,
    pub species_type: String,
    pub date: String,
    pub time: String,
    pub coordinates: String,
    pub image_count: usize,
}

fn or_default(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

impl From<&Sighting> for SightingView {
    fn from(sighting: &Sighting) -> Self {
        Self {
            id: sighting.id.clone(),
            species: or_default(&sighting.species_name, UNKNOWN_SPECIES),
            species_type: or_default(&sighting.species_type, UNKNOWN_TYPE),
            date: or_default(&sighting.date, UNKNOWN_DATE),
            time: or_default(&sighting.time, UNKNOWN_TIME),
            coordinates: or_default(&sighting.coordinates, UNKNOWN_LOCATION),
            image_count: sighting.images.len(),
        }
    }
}

impl SightingView {
    pub fn from_sightings(sightings: &[Sighting]) -> Vec<Self> {
        sightings.iter().map(Self::from).collect()
    }
}
