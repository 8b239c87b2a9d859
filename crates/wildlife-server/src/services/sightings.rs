//! Sighting service
//!
//! Validates submissions, persists them as documents and reads them back.

use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};
use wildlife_core::images::validate_uploads;
use wildlife_core::ports::{Document, DocumentFilter, DocumentStore, DocumentUpdate};
use wildlife_core::{
    AttachMode, ImageUpload, Result, Sighting, SightingDraft, WildlifeError,
};

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M";

pub struct SightingService {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl SightingService {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Validate and store a new sighting, returning it with its assigned id.
    pub async fn create(
        &self,
        draft: Option<SightingDraft>,
        uploads: &[ImageUpload],
    ) -> Result<Sighting> {
        let draft = draft.ok_or_else(|| WildlifeError::validation("Sighting data is required"))?;

        let (species_name, species_type, coordinates) = match (
            required(draft.species_name),
            required(draft.species_type),
            required(draft.coordinates),
        ) {
            (Some(name), Some(kind), Some(coordinates)) => (name, kind, coordinates),
            _ => {
                return Err(WildlifeError::validation(
                    "Species name, species type, and coordinates are required",
                ))
            }
        };

        let created_at = Utc::now();
        let images = validate_uploads(uploads, created_at)?;

        let mut sighting = Sighting {
            id: String::new(),
            species_name,
            species_type,
            coordinates,
            date: required(draft.date)
                .unwrap_or_else(|| created_at.format(DATE_FORMAT).to_string()),
            time: required(draft.time)
                .unwrap_or_else(|| created_at.format(TIME_FORMAT).to_string()),
            images,
            created_at,
            updated_at: None,
        };

        let id = self
            .store
            .insert_one(&self.collection, to_document(&sighting)?)
            .await?;
        sighting.id = id;

        info!(
            "Recorded sighting {} ({}, {} image(s))",
            sighting.id,
            sighting.species_name,
            sighting.images.len()
        );
        Ok(sighting)
    }

    /// Every stored sighting in insertion order
    pub async fn list_all(&self) -> Result<Vec<Sighting>> {
        let documents = self
            .store
            .find(&self.collection, &DocumentFilter::All)
            .await?;

        let total = documents.len();
        let sightings: Vec<Sighting> = documents
            .into_iter()
            .filter_map(|document| match from_document(document) {
                Ok(sighting) => Some(sighting),
                Err(e) => {
                    warn!("Skipping undecodable sighting document: {}", e);
                    None
                }
            })
            .collect();

        debug!("Listed {} of {} sighting documents", sightings.len(), total);
        Ok(sightings)
    }

    /// Replace or extend a sighting's images and return the updated sighting.
    pub async fn attach_images(
        &self,
        sighting_id: Option<&str>,
        uploads: &[ImageUpload],
        mode: AttachMode,
    ) -> Result<Sighting> {
        let sighting_id = sighting_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| WildlifeError::validation("Sighting ID is required"))?;

        if uploads.is_empty() {
            return Err(WildlifeError::validation("At least one image is required"));
        }

        let updated_at = Utc::now();
        let images = validate_uploads(uploads, updated_at)?
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut set = Map::new();
        set.insert("updatedAt".to_string(), serde_json::to_value(updated_at)?);

        let update = match mode {
            AttachMode::Replace => {
                set.insert("images".to_string(), Value::Array(images));
                DocumentUpdate::Set(set)
            }
            AttachMode::Append => DocumentUpdate::Push {
                field: "images".to_string(),
                values: images,
                set,
            },
        };

        let filter = DocumentFilter::by_id(sighting_id);
        self.store
            .update_one(&self.collection, &filter, &update)
            .await?;

        let document = self
            .store
            .find_one(&self.collection, &filter)
            .await?
            .ok_or_else(|| WildlifeError::NotFound(format!("Sighting {} not found", sighting_id)))?;

        let sighting = from_document(document)?;
        info!(
            "Attached images to sighting {} (mode={}, now {} image(s))",
            sighting.id,
            mode,
            sighting.images.len()
        );
        Ok(sighting)
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn to_document(sighting: &Sighting) -> Result<Document> {
    match serde_json::to_value(sighting)? {
        Value::Object(document) => Ok(document),
        other => Err(WildlifeError::Serialization(format!(
            "sighting did not serialize to an object: {}",
            other
        ))),
    }
}

fn from_document(document: Document) -> Result<Sighting> {
    Ok(serde_json::from_value(Value::Object(document))?)
}
