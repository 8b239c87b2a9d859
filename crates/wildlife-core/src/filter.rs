//! Client-side filtering of sightings

use crate::geo::UNKNOWN_LOCATION;
use crate::view::{SightingView, UNKNOWN_TYPE};
use std::collections::BTreeSet;

/// Search and filter criteria; empty criteria match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SightingFilter {
    /// Case-insensitive substring of the species name or the coordinates
    pub search: Option<String>,
    /// Exact species type
    pub species_type: Option<String>,
    /// Exact coordinate text
    pub location: Option<String>,
}

impl SightingFilter {
    pub fn is_empty(&self) -> bool {
        active(&self.search).is_none()
            && active(&self.species_type).is_none()
            && active(&self.location).is_none()
    }

    pub fn matches(&self, sighting: &SightingView) -> bool {
        if let Some(query) = active(&self.search) {
            let query = query.to_lowercase();
            if !sighting.species.to_lowercase().contains(&query)
                && !sighting.coordinates.to_lowercase().contains(&query)
            {
                return false;
            }
        }
        if let Some(species_type) = active(&self.species_type) {
            if sighting.species_type != species_type {
                return false;
            }
        }
        if let Some(location) = active(&self.location) {
            if sighting.coordinates != location {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, sightings: &'a [SightingView]) -> Vec<&'a SightingView> {
        sightings.iter().filter(|s| self.matches(s)).collect()
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Sorted distinct species types, excluding the placeholder for missing ones
pub fn unique_species_types(sightings: &[SightingView]) -> Vec<String> {
    distinct(sightings.iter().map(|s| s.species_type.as_str()), UNKNOWN_TYPE)
}

/// Sorted distinct coordinate strings, excluding the unknown location
pub fn unique_locations(sightings: &[SightingView]) -> Vec<String> {
    distinct(sightings.iter().map(|s| s.coordinates.as_str()), UNKNOWN_LOCATION)
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>, placeholder: &str) -> Vec<String> {
    values
        .filter(|v| !v.is_empty() && *v != placeholder)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
