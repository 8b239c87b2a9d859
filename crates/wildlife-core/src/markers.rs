//! Grouping sightings into map markers
//!
//! Sightings whose coordinates lie within [`crate::geo::PROXIMITY_THRESHOLD_DEG`] of a
//! marker's anchor share that marker. The anchor is the first sighting placed
//! in the group, so grouping is a single pass over the input and does not chain
//! neighbours transitively. Sightings without usable coordinates all land on
//! one marker at [`DEFAULT_CENTER`].

use crate::geo::{LatLng, DEFAULT_CENTER, UNKNOWN_LOCATION};
use crate::view::SightingView;
use serde::Serialize;

/// Species listed in a grouped marker title before it is elided
const TITLE_SPECIES_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub id: String,
    pub position: LatLng,
    pub title: String,
    pub sighting_count: usize,
    pub sightings: Vec<SightingView>,
    /// Coordinate text of the anchoring sighting, or "Unknown Location"
    pub original_coordinates: String,
}

struct Group {
    anchor: Option<LatLng>,
    key: String,
    sightings: Vec<SightingView>,
}

pub fn group_markers(sightings: &[SightingView]) -> Vec<MapMarker> {
    let mut groups: Vec<Group> = Vec::new();

    for sighting in sightings {
        let position = LatLng::parse(&sighting.coordinates);
        let existing = groups.iter_mut().find(|group| match (group.anchor, position) {
            (Some(anchor), Some(point)) => anchor.is_near(&point),
            (None, None) => true,
            _ => false,
        });

        match existing {
            Some(group) => group.sightings.push(sighting.clone()),
            None => groups.push(Group {
                anchor: position,
                key: match position {
                    Some(_) => sighting.coordinates.clone(),
                    None => UNKNOWN_LOCATION.to_string(),
                },
                sightings: vec![sighting.clone()],
            }),
        }
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(index, group)| MapMarker {
            id: format!("grouped-{}-{}", group.key, index),
            position: group.anchor.unwrap_or(DEFAULT_CENTER),
            title: marker_title(&group.sightings),
            sighting_count: group.sightings.len(),
            original_coordinates: group.key,
            sightings: group.sightings,
        })
        .collect()
}

fn marker_title(sightings: &[SightingView]) -> String {
    match sightings {
        [] => String::new(),
        [only] => format!("{} ({})", only.species, only.species_type),
        many => {
            let names: Vec<&str> = many
                .iter()
                .take(TITLE_SPECIES_LIMIT)
                .map(|s| s.species.as_str())
                .collect();
            let ellipsis = if many.len() > TITLE_SPECIES_LIMIT {
                "..."
            } else {
                ""
            };
            format!("{} observations: {}{}", many.len(), names.join(", "), ellipsis)
        }
    }
}
