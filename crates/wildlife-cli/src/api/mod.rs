//! API client for the Wildlife Sightings server

use anyhow::{Context, Result};
use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use wildlife_core::{
    ApiResponse, AttachMode, ImageUpload, Sighting, SightingDraft, SightingRequest,
};

pub const SIGHTINGS_PATH: &str = "/wildlife-sightings";

pub struct Client {
    http: ReqwestClient,
    base_url: String,
}

/// A successful create, as reported by the server
#[derive(Debug)]
pub struct Recorded {
    pub message: String,
    pub sighting: Sighting,
    pub image_ids: Vec<String>,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: ReqwestClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create client from saved settings
    pub fn from_settings() -> Result<Self> {
        let settings = crate::config::SettingsManager::load()?;
        Ok(Self::new(settings.server_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// WebSocket endpoint of the push channel
    pub fn ws_url(&self) -> String {
        let base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            self.base_url.clone()
        };
        format!("{}/ws", base)
    }

    pub async fn create_sighting(
        &self,
        draft: SightingDraft,
        images: Vec<ImageUpload>,
    ) -> Result<Recorded> {
        let response: ApiResponse<Sighting> = self
            .post(&SightingRequest::NewRecord {
                sighting_data: Some(draft),
                images,
            })
            .await
            .context("Failed to record sighting")?;

        let sighting = response
            .data
            .ok_or_else(|| anyhow::anyhow!("Server response is missing the created sighting"))?;

        Ok(Recorded {
            message: response.message,
            image_ids: response.image_ids.unwrap_or_default(),
            sighting,
        })
    }

    pub async fn list_sightings(&self) -> Result<Vec<Sighting>> {
        let response: ApiResponse<Vec<Sighting>> = self
            .post(&SightingRequest::RetrieveAll)
            .await
            .context("Failed to retrieve sightings")?;
        Ok(response.data.unwrap_or_default())
    }

    pub async fn attach_images(
        &self,
        sighting_id: &str,
        images: Vec<ImageUpload>,
        mode: AttachMode,
    ) -> Result<Sighting> {
        let response: ApiResponse<Sighting> = self
            .post(&SightingRequest::AttachImages {
                sighting_id: Some(sighting_id.to_string()),
                images,
                mode,
            })
            .await
            .context("Failed to attach images")?;

        response
            .data
            .ok_or_else(|| anyhow::anyhow!("Server response is missing the updated sighting"))
    }

    async fn post<T: DeserializeOwned>(&self, request: &SightingRequest) -> Result<ApiResponse<T>> {
        let url = format!("{}{}", self.base_url, SIGHTINGS_PATH);
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to reach server at {}", self.base_url))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
            let message = error["message"].as_str().unwrap_or("Unknown error");
            match error["error"].as_str() {
                Some(detail) => anyhow::bail!("{} ({}): {}", message, status, detail),
                None => anyhow::bail!("{} ({})", message, status),
            }
        }

        let parsed: ApiResponse<T> =
            serde_json::from_str(&body).context("Failed to parse server response")?;
        if !parsed.success {
            anyhow::bail!("{}", parsed.message);
        }
        Ok(parsed)
    }
}
