//! Sighting types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded wildlife observation as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sighting {
    /// Assigned by the document store on creation
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub species_name: String,
    #[serde(default)]
    pub species_type: String,
    /// `"lat, lng"`
    #[serde(default)]
    pub coordinates: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub images: Vec<SightingImage>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Sighting {
    /// Identifiers handed back to the submitter for each attached image
    pub fn image_ids(&self) -> Vec<String> {
        (0..self.images.len())
            .map(|index| format!("{}_image_{}", self.id, index))
            .collect()
    }
}

/// An image attached to a sighting, stored inline as a data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingImage {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "data", alias = "inlineData")]
    pub inline_data: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Sighting fields as submitted by a client.
///
/// Every field is optional on the wire so that missing values surface as
/// validation errors rather than decode failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl SightingDraft {
    pub fn new(
        species_name: impl Into<String>,
        species_type: impl Into<String>,
        coordinates: impl Into<String>,
    ) -> Self {
        Self {
            species_name: Some(species_name.into()),
            species_type: Some(species_type.into()),
            coordinates: Some(coordinates.into()),
            date: None,
            time: None,
        }
    }
}

/// An image as uploaded by a client, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageUpload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Data URL, e.g. `data:image/jpeg;base64,...`
    #[serde(default, alias = "inlineData", skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}
