//! Business logic services

pub mod sightings;

pub use sightings::SightingService;
