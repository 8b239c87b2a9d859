//! HTTP request and response envelopes

use super::{ImageUpload, SightingDraft};
use serde::{Deserialize, Serialize};

/// Purposes accepted by the sightings endpoint, in wire spelling
pub const PURPOSES: [&str; 3] = ["newRecord", "retrieveAll", "attachImages"];

/// Body of `POST /wildlife-sightings`, dispatched on the `purpose` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "purpose", rename_all = "camelCase")]
pub enum SightingRequest {
    NewRecord {
        #[serde(rename = "sightingData", default)]
        sighting_data: Option<SightingDraft>,
        #[serde(default)]
        images: Vec<ImageUpload>,
    },
    RetrieveAll,
    AttachImages {
        #[serde(rename = "sightingId", default)]
        sighting_id: Option<String>,
        #[serde(default)]
        images: Vec<ImageUpload>,
        #[serde(default)]
        mode: AttachMode,
    },
}

/// How attached images combine with the ones already on a sighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachMode {
    /// Replace the image list wholesale
    #[default]
    Replace,
    /// Append to the existing image list
    Append,
}

impl std::fmt::Display for AttachMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachMode::Replace => write!(f, "replace"),
            AttachMode::Append => write!(f, "append"),
        }
    }
}

/// Uniform `{success, message, data}` response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ids: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
            image_ids: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: None,
            image_ids: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_image_ids(mut self, image_ids: Vec<String>) -> Self {
        self.image_ids = Some(image_ids);
        self
    }
}
