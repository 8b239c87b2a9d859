//! Local sighting state fed by the initial listing and push events

use crate::view::SightingView;
use crate::{ServerMessage, Sighting};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Sightings known to a client, in arrival order, without duplicates
#[derive(Debug, Clone, Default)]
pub struct SightingFeed {
    sightings: Vec<Sighting>,
    ids: HashSet<String>,
    last_update: Option<DateTime<Utc>>,
}

impl SightingFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sightings(sightings: Vec<Sighting>) -> Self {
        let mut feed = Self::new();
        for sighting in sightings {
            feed.insert(sighting);
        }
        feed
    }

    /// Add a sighting unless one with the same id is already present
    pub fn insert(&mut self, sighting: Sighting) -> bool {
        if !self.ids.insert(sighting.id.clone()) {
            return false;
        }
        self.sightings.push(sighting);
        self.last_update = Some(Utc::now());
        true
    }

    /// Merge a push message. Returns the sighting when it was new.
    pub fn merge(&mut self, message: &ServerMessage) -> Option<&Sighting> {
        match message {
            ServerMessage::NewSighting { data, .. } => {
                if self.insert(data.clone()) {
                    self.sightings.last()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn sightings(&self) -> &[Sighting] {
        &self.sightings
    }

    pub fn views(&self) -> Vec<SightingView> {
        SightingView::from_sightings(&self.sightings)
    }

    pub fn len(&self) -> usize {
        self.sightings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sightings.is_empty()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }
}
