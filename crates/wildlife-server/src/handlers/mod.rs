//! HTTP handlers

pub mod health;
pub mod sightings;
pub mod ws;

pub use health::health;
