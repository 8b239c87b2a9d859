//! Wildlife Types - Pure type definitions shared by the server and the client
//!
//! This crate contains only serde data types with no async runtime dependencies.
//! Field names follow the JSON wire format (`camelCase`, `_id`).

pub mod api;
pub mod message;
pub mod sighting;

pub use api::*;
pub use message::*;
pub use sighting::*;
