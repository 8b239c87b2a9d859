//! Wildlife Core Library
//!
//! Domain logic shared by the server and the client: the error type, the
//! document store port, coordinate handling, image validation, and the
//! client-side view helpers (filtering, marker grouping, live feed).

// Re-export pure types from wildlife-types
pub use wildlife_types::*;

pub mod error;
pub mod feed;
pub mod filter;
pub mod geo;
pub mod images;
pub mod markers;
pub mod ports;
pub mod view;

pub use error::{Result, WildlifeError};
pub use feed::SightingFeed;
pub use filter::SightingFilter;
pub use geo::LatLng;
pub use markers::{group_markers, MapMarker};
pub use view::SightingView;
